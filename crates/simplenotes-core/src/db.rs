use crate::codec::{decode_highlights, to_column};
use crate::highlight::retain_valid;
use crate::notes::{validate_fields, NewNote, Note, NoteError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

pub struct Database {
    conn: Connection,
}

pub struct Migration {
    pub version: i64,
    pub name: &'static str,
    pub up: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "init",
    up: "CREATE TABLE IF NOT EXISTS notes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            message TEXT NOT NULL DEFAULT '',
            color TEXT NOT NULL,
            message_highlights TEXT,
            created_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS notes_created_at
          ON notes(created_at);",
}];

const NOTE_COLUMNS: &str = "id, title, message, color, message_highlights, created_at";

impl Database {
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        let conn = Connection::open(path)?;
        Self::configure(&conn)?;
        tracing::debug!(path = %path.display(), "opened notes database");
        Ok(Self { conn })
    }

    pub fn new_in_memory() -> rusqlite::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        Ok(Self { conn })
    }

    fn configure(conn: &Connection) -> rusqlite::Result<()> {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA busy_timeout = 5000;",
        )
    }

    pub fn latest_migration_version() -> i64 {
        MIGRATIONS.last().map(|migration| migration.version).unwrap_or(0)
    }

    pub fn current_schema_version(&self) -> rusqlite::Result<i64> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations')",
            [],
            |row| row.get(0),
        )?;
        if !exists {
            return Ok(0);
        }
        self.conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
    }

    pub fn run_migrations(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at TEXT DEFAULT CURRENT_TIMESTAMP
            );",
        )?;

        let current_version = self.current_schema_version()?;

        for migration in MIGRATIONS {
            if migration.version > current_version {
                let tx = self.conn.unchecked_transaction()?;
                tx.execute_batch(migration.up)?;
                tx.execute(
                    "INSERT INTO schema_migrations (version, name) VALUES (?1, ?2)",
                    params![migration.version, migration.name],
                )?;
                tx.commit()?;
                tracing::info!(version = migration.version, name = migration.name, "applied migration");
            }
        }

        Ok(())
    }

    pub fn insert_note(&self, note: &NewNote) -> Result<Note, NoteError> {
        self.insert_note_at(note, chrono::Utc::now().timestamp_millis())
    }

    pub fn insert_note_at(&self, note: &NewNote, created_at: i64) -> Result<Note, NoteError> {
        validate_fields(&note.title, &note.message)?;
        let highlights = retain_valid(&note.highlights, &note.message);
        self.conn.execute(
            "INSERT INTO notes (title, message, color, message_highlights, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                note.title,
                note.message,
                note.color,
                to_column(&highlights),
                created_at
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, "inserted note");
        Ok(Note {
            id,
            title: note.title.clone(),
            message: note.message.clone(),
            color: note.color.clone(),
            highlights,
            created_at,
        })
    }

    pub fn get_note(&self, id: i64) -> Result<Option<Note>, NoteError> {
        let note = self
            .conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1"),
                [id],
                note_from_row,
            )
            .optional()?;
        Ok(note)
    }

    /// Newest first.
    pub fn list_notes(&self) -> Result<Vec<Note>, NoteError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes ORDER BY created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], note_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Replaces every mutable field of the stored row. `id` and
    /// `created_at` are never written.
    pub fn update_note(&self, note: &Note) -> Result<Note, NoteError> {
        validate_fields(&note.title, &note.message)?;
        let highlights = retain_valid(&note.highlights, &note.message);
        let changed = self.conn.execute(
            "UPDATE notes
             SET title = ?1, message = ?2, color = ?3, message_highlights = ?4
             WHERE id = ?5",
            params![
                note.title,
                note.message,
                note.color,
                to_column(&highlights),
                note.id
            ],
        )?;
        if changed == 0 {
            return Err(NoteError::NotFound(note.id));
        }
        tracing::debug!(id = note.id, "updated note");
        self.get_note(note.id)?.ok_or(NoteError::NotFound(note.id))
    }

    pub fn delete_note(&self, id: i64) -> Result<(), NoteError> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(NoteError::NotFound(id));
        }
        tracing::debug!(id, "deleted note");
        Ok(())
    }
}

#[cfg(test)]
impl Database {
    pub(crate) fn execute_batch(&self, sql: &str) -> rusqlite::Result<()> {
        self.conn.execute_batch(sql)
    }
}

fn note_from_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    let stored: Option<String> = row.get(4)?;
    Ok(Note {
        id: row.get(0)?,
        title: row.get(1)?,
        message: row.get(2)?,
        color: row.get(3)?,
        highlights: decode_highlights(stored.as_deref()),
        created_at: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::Database;
    use crate::colors::HighlightColor::{Green, Yellow};
    use crate::highlight::HighlightRange;
    use crate::notes::{NewNote, NoteError};
    use tempfile::tempdir;

    fn setup_db() -> Database {
        let db = Database::new_in_memory().expect("db init");
        db.run_migrations().expect("migrations");
        db
    }

    fn new_note(title: &str, message: &str) -> NewNote {
        NewNote {
            title: title.into(),
            message: message.into(),
            color: "Blue".into(),
            highlights: Vec::new(),
        }
    }

    fn table_columns(db: &Database) -> Vec<String> {
        let mut stmt = db.conn.prepare("PRAGMA table_info(notes)").expect("table info");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("table info rows");
        rows.collect::<rusqlite::Result<Vec<String>>>()
            .expect("table info collect")
    }

    fn stored_highlights(db: &Database, id: i64) -> Option<String> {
        db.conn
            .query_row(
                "SELECT message_highlights FROM notes WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .expect("stored highlights")
    }

    #[test]
    fn migrations_create_notes_table() {
        let db = setup_db();
        let columns = table_columns(&db);
        for column in ["id", "title", "message", "color", "message_highlights", "created_at"] {
            assert!(columns.contains(&column.to_string()), "missing {column}");
        }
        assert_eq!(db.current_schema_version().expect("version"), 1);
    }

    #[test]
    fn migrations_are_idempotent() {
        let db = setup_db();
        db.run_migrations().expect("second run");
        assert_eq!(
            db.current_schema_version().expect("version"),
            Database::latest_migration_version()
        );
    }

    #[test]
    fn fresh_database_reports_version_zero() {
        let db = Database::new_in_memory().expect("db init");
        assert_eq!(db.current_schema_version().expect("version"), 0);
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let db = setup_db();
        let first = db.insert_note(&new_note("One", "")).expect("insert");
        let second = db.insert_note(&new_note("Two", "")).expect("insert");
        assert!(first.id > 0);
        assert!(second.id > first.id);
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let db = setup_db();
        let first = db.insert_note(&new_note("One", "")).expect("insert");
        db.delete_note(first.id).expect("delete");
        let second = db.insert_note(&new_note("Two", "")).expect("insert");
        assert!(second.id > first.id);
    }

    #[test]
    fn insert_rejects_invalid_fields() {
        let db = setup_db();
        assert!(matches!(
            db.insert_note(&new_note(" ", "body")),
            Err(NoteError::BlankTitle)
        ));
        assert!(matches!(
            db.insert_note(&new_note("t", &"x".repeat(300))),
            Err(NoteError::MessageTooLong { .. })
        ));
        assert!(db.list_notes().expect("list").is_empty());
    }

    #[test]
    fn highlights_round_trip_through_storage() {
        let db = setup_db();
        let mut note = new_note("Quote", "to be or not to be");
        note.highlights = vec![
            HighlightRange::new(0, 3, Yellow),
            HighlightRange::new(5, 8, Green),
        ];
        let inserted = db.insert_note(&note).expect("insert");
        assert_eq!(
            stored_highlights(&db, inserted.id).as_deref(),
            Some("0,3,Yellow|5,8,Green")
        );

        let loaded = db.get_note(inserted.id).expect("get").expect("exists");
        assert_eq!(loaded, inserted);
    }

    #[test]
    fn invalid_highlights_are_never_persisted() {
        let db = setup_db();
        let mut note = new_note("Short", "abc");
        note.highlights = vec![
            HighlightRange::new(0, 2, Yellow),
            HighlightRange::new(1, 9, Green),
        ];
        let inserted = db.insert_note(&note).expect("insert");
        assert_eq!(inserted.highlights, vec![HighlightRange::new(0, 2, Yellow)]);
        assert_eq!(stored_highlights(&db, inserted.id).as_deref(), Some("0,2,Yellow"));
    }

    #[test]
    fn empty_highlights_stored_as_null() {
        let db = setup_db();
        let inserted = db.insert_note(&new_note("Plain", "text")).expect("insert");
        assert_eq!(stored_highlights(&db, inserted.id), None);
        let loaded = db.get_note(inserted.id).expect("get").expect("exists");
        assert!(loaded.highlights.is_empty());
    }

    #[test]
    fn malformed_stored_highlights_are_skipped_on_read() {
        let db = setup_db();
        let inserted = db.insert_note(&new_note("Legacy", "0123456789")).expect("insert");
        db.conn
            .execute(
                "UPDATE notes SET message_highlights = ?1 WHERE id = ?2",
                rusqlite::params!["0,3,Yellow|bad|5,8,Green", inserted.id],
            )
            .expect("raw update");

        let loaded = db.get_note(inserted.id).expect("get").expect("exists");
        assert_eq!(
            loaded.highlights,
            vec![
                HighlightRange::new(0, 3, Yellow),
                HighlightRange::new(5, 8, Green),
            ]
        );
    }

    #[test]
    fn list_orders_newest_first() {
        let db = setup_db();
        let old = db.insert_note_at(&new_note("Old", ""), 1_000).expect("insert");
        let new = db.insert_note_at(&new_note("New", ""), 2_000).expect("insert");
        let tie = db.insert_note_at(&new_note("Tie", ""), 2_000).expect("insert");

        let ids: Vec<i64> = db
            .list_notes()
            .expect("list")
            .into_iter()
            .map(|note| note.id)
            .collect();
        assert_eq!(ids, vec![tie.id, new.id, old.id]);
    }

    #[test]
    fn update_replaces_fields_but_not_identity() {
        let db = setup_db();
        let inserted = db.insert_note_at(&new_note("Draft", "hello"), 5_000).expect("insert");

        let mut replacement = inserted.clone();
        replacement.title = "Final".into();
        replacement.message = "hello world".into();
        replacement.color = "Red".into();
        replacement.highlights = vec![HighlightRange::new(6, 11, Green)];
        replacement.created_at = 99;

        let updated = db.update_note(&replacement).expect("update");
        assert_eq!(updated.id, inserted.id);
        assert_eq!(updated.created_at, 5_000);
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.message, "hello world");
        assert_eq!(updated.color, "Red");
        assert_eq!(updated.highlights, vec![HighlightRange::new(6, 11, Green)]);
    }

    #[test]
    fn update_and_delete_report_missing_notes() {
        let db = setup_db();
        let mut ghost = db.insert_note(&new_note("Ghost", "")).expect("insert");
        db.delete_note(ghost.id).expect("delete");

        assert!(db.get_note(ghost.id).expect("get").is_none());
        assert!(matches!(db.delete_note(ghost.id), Err(NoteError::NotFound(_))));
        ghost.title = "Still here?".into();
        assert!(matches!(db.update_note(&ghost), Err(NoteError::NotFound(_))));
    }

    #[test]
    fn notes_persist_across_reopen() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("notes.db");

        let id = {
            let db = Database::open(&path).expect("open");
            db.run_migrations().expect("migrations");
            db.insert_note(&new_note("Kept", "on disk")).expect("insert").id
        };

        let db = Database::open(&path).expect("reopen");
        db.run_migrations().expect("migrations");
        let note = db.get_note(id).expect("get").expect("exists");
        assert_eq!(note.title, "Kept");
        assert_eq!(note.message, "on disk");
    }
}
