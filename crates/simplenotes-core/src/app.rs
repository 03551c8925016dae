use crate::config::{ConfigError, ConfigStore, NotesConfig};
use crate::db::Database;
use crate::notes::NoteError;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Note(NoteError),
    Db(rusqlite::Error),
    Io(std::io::Error),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<NoteError> for AppError {
    fn from(err: NoteError) -> Self {
        Self::Note(err)
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Db(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "{err}"),
            AppError::Note(err) => write!(f, "{err}"),
            AppError::Db(err) => write!(f, "database error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Note(err) => Some(err),
            AppError::Db(err) => Some(err),
            AppError::Io(err) => Some(err),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Workspace {
    pub config: NotesConfig,
    pub config_path: PathBuf,
    pub database_path: PathBuf,
}

/// Reads the config (or defaults) and resolves where the database lives.
/// `database_override` wins over the configured path.
pub fn load_workspace(
    store: &ConfigStore,
    database_override: Option<&Path>,
) -> Result<Workspace, AppError> {
    let config = store.load()?;
    let database_path = database_override
        .map(Path::to_path_buf)
        .unwrap_or_else(|| store.database_path(&config));
    Ok(Workspace {
        config,
        config_path: store.config_path().to_path_buf(),
        database_path,
    })
}

pub fn open_database(db_path: &Path) -> Result<Database, AppError> {
    if let Some(parent) = db_path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let db = Database::open(db_path)?;
    db.run_migrations()?;
    Ok(db)
}

pub fn open_workspace_database(workspace: &Workspace) -> Result<Database, AppError> {
    open_database(&workspace.database_path)
}
