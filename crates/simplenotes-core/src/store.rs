use crate::db::Database;
use crate::notes::{NewNote, Note, NoteError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    NotesChanged,
    SelectionChanged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(StoreEvent, &NotesStore)>;

/// Note list state with change notifications, backed by the database.
pub struct NotesStore {
    db: Database,
    notes: Vec<Note>,
    selected: Option<Note>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl NotesStore {
    pub fn new(db: Database) -> Result<Self, NoteError> {
        let notes = db.list_notes()?;
        Ok(Self {
            db,
            notes,
            selected: None,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Newest first.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn selected(&self) -> Option<&Note> {
        self.selected.as_ref()
    }

    pub fn subscribe(
        &mut self,
        listener: impl FnMut(StoreEvent, &NotesStore) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn refresh(&mut self) -> Result<(), NoteError> {
        self.notes = self.db.list_notes()?;
        self.emit(StoreEvent::NotesChanged);
        Ok(())
    }

    /// Reloads the list after a committed write. A failed reload is logged
    /// and `patch` is applied to the cached list instead, so the caller
    /// still sees the write succeed.
    fn reload_after_write(&mut self, patch: impl FnOnce(&mut Vec<Note>)) {
        match self.db.list_notes() {
            Ok(notes) => self.notes = notes,
            Err(err) => {
                tracing::warn!(%err, "reloading notes failed; patching cached list");
                patch(&mut self.notes);
            }
        }
    }

    /// Inserts the note and returns it. The row is committed once this
    /// returns `Ok`, even if reloading the list afterwards fails.
    pub fn add_note(&mut self, note: &NewNote) -> Result<Note, NoteError> {
        let inserted = self.db.insert_note(note)?;
        self.reload_after_write(|notes| notes.insert(0, inserted.clone()));
        self.emit(StoreEvent::NotesChanged);
        Ok(inserted)
    }

    pub fn update_note(&mut self, note: &Note) -> Result<Note, NoteError> {
        let updated = self.db.update_note(note)?;
        self.reload_after_write(|notes| {
            if let Some(slot) = notes.iter_mut().find(|cached| cached.id == updated.id) {
                *slot = updated.clone();
            }
        });
        let selection_changed = match self.selected.as_mut() {
            Some(selected) if selected.id == updated.id => {
                *selected = updated.clone();
                true
            }
            _ => false,
        };
        self.emit(StoreEvent::NotesChanged);
        if selection_changed {
            self.emit(StoreEvent::SelectionChanged);
        }
        Ok(updated)
    }

    pub fn delete_note(&mut self, id: i64) -> Result<(), NoteError> {
        self.db.delete_note(id)?;
        self.reload_after_write(|notes| notes.retain(|cached| cached.id != id));
        let selection_changed = self.selected.as_ref().is_some_and(|selected| selected.id == id);
        if selection_changed {
            self.selected = None;
        }
        self.emit(StoreEvent::NotesChanged);
        if selection_changed {
            self.emit(StoreEvent::SelectionChanged);
        }
        Ok(())
    }

    pub fn select(&mut self, id: i64) -> Result<Note, NoteError> {
        let note = self.db.get_note(id)?.ok_or(NoteError::NotFound(id))?;
        self.selected = Some(note.clone());
        self.emit(StoreEvent::SelectionChanged);
        Ok(note)
    }

    pub fn clear_selection(&mut self) {
        if self.selected.take().is_some() {
            self.emit(StoreEvent::SelectionChanged);
        }
    }

    fn emit(&mut self, event: StoreEvent) {
        // Listeners get a shared view of the store, so detach them first.
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, listener) in listeners.iter_mut() {
            listener(event, &*self);
        }
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }
}
