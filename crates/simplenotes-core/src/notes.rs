use crate::colors::{HighlightColor, NoteColor};
use crate::highlight::{self, char_len, HighlightRange};
use std::fmt;

pub const MAX_MESSAGE_CHARS: usize = 256;

#[derive(Debug)]
pub enum NoteError {
    BlankTitle,
    MessageTooLong { chars: usize },
    NotFound(i64),
    Db(rusqlite::Error),
}

impl From<rusqlite::Error> for NoteError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Db(err)
    }
}

impl fmt::Display for NoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteError::BlankTitle => f.write_str("note title must not be blank"),
            NoteError::MessageTooLong { chars } => write!(
                f,
                "note message is {chars} characters, the limit is {MAX_MESSAGE_CHARS}"
            ),
            NoteError::NotFound(id) => write!(f, "note {id} not found"),
            NoteError::Db(err) => write!(f, "database error: {err}"),
        }
    }
}

impl std::error::Error for NoteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NoteError::Db(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub message: String,
    pub color: String,
    pub highlights: Vec<HighlightRange>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Note {
    pub fn color_tag(&self) -> NoteColor {
        NoteColor::resolve(&self.color)
    }

    pub fn created_at_utc(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp_millis(self.created_at)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub message: String,
    pub color: String,
    pub highlights: Vec<HighlightRange>,
}

pub fn validate_fields(title: &str, message: &str) -> Result<(), NoteError> {
    if title.trim().is_empty() {
        return Err(NoteError::BlankTitle);
    }
    let chars = message.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(NoteError::MessageTooLong { chars });
    }
    Ok(())
}

/// Form state for adding or editing a note.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    message: String,
    pub color: NoteColor,
    highlights: Vec<HighlightRange>,
}

impl NoteDraft {
    pub fn new(color: NoteColor) -> Self {
        Self {
            title: String::new(),
            message: String::new(),
            color,
            highlights: Vec::new(),
        }
    }

    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            message: note.message.clone(),
            color: note.color_tag(),
            highlights: highlight::retain_valid(&note.highlights, &note.message),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn highlights(&self) -> &[HighlightRange] {
        &self.highlights
    }

    /// Replaces the message, re-clipping highlights to it. Text over the
    /// length limit is refused and the draft stays as it was.
    pub fn set_message(&mut self, message: impl Into<String>) -> bool {
        let message = message.into();
        if char_len(&message) as usize > MAX_MESSAGE_CHARS {
            return false;
        }
        self.highlights = highlight::adjust_highlights(&self.highlights, &self.message, &message);
        self.message = message;
        true
    }

    pub fn add_highlight(&mut self, start: i64, end: i64, color: HighlightColor) -> bool {
        let before = self.highlights.len();
        self.highlights =
            highlight::insert_highlight(&self.highlights, &self.message, start, end, color);
        self.highlights.len() != before
    }

    pub fn remove_highlight(&mut self, index: usize) -> Option<HighlightRange> {
        let removed = self.highlights.get(index).copied()?;
        self.highlights = highlight::remove_highlight(&self.highlights, index);
        Some(removed)
    }

    pub fn clear_highlights(&mut self) {
        self.highlights.clear();
    }

    pub fn can_save(&self) -> bool {
        validate_fields(&self.title, &self.message).is_ok()
    }

    pub fn to_new_note(&self) -> Result<NewNote, NoteError> {
        validate_fields(&self.title, &self.message)?;
        Ok(NewNote {
            title: self.title.clone(),
            message: self.message.clone(),
            color: self.color.name().to_string(),
            highlights: self.highlights.clone(),
        })
    }

    /// Full replacement record for `note`; `id` and `created_at` carry over.
    pub fn apply_to(&self, note: &Note) -> Result<Note, NoteError> {
        let fields = self.to_new_note()?;
        Ok(Note {
            id: note.id,
            title: fields.title,
            message: fields.message,
            color: fields.color,
            highlights: fields.highlights,
            created_at: note.created_at,
        })
    }
}
