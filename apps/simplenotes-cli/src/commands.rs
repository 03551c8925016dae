use crate::cli::Command;
use anyhow::{bail, Context, Result};
use simplenotes_core::colors::{HighlightColor, NoteColor};
use simplenotes_core::config::NotesConfig;
use simplenotes_core::highlight::{preview, HighlightRange};
use simplenotes_core::notes::{Note, NoteDraft};
use simplenotes_core::render::styled_segments;
use simplenotes_core::store::NotesStore;
use std::io::Write;

pub fn run(
    command: Command,
    store: &mut NotesStore,
    config: &NotesConfig,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Add {
            title,
            message,
            color,
        } => {
            let mut draft = NoteDraft::new(color.unwrap_or(config.default_note_color));
            draft.title = title;
            set_message(&mut draft, message)?;
            let note = store.add_note(&draft.to_new_note()?)?;
            writeln!(out, "created note {}", note.id)?;
        }
        Command::List => {
            if store.notes().is_empty() {
                writeln!(out, "no notes")?;
            }
            for note in store.notes() {
                writeln!(
                    out,
                    "{:>4}  {:<6}  {}  {}{}",
                    note.id,
                    note.color_tag(),
                    format_created(note),
                    note.title,
                    highlight_badge(note.highlights.len())
                )?;
            }
        }
        Command::Show { id } => {
            let note = store.select(id)?;
            write_note(out, &note)?;
        }
        Command::Edit {
            id,
            title,
            message,
            color,
        } => {
            edit_note(store, id, |draft| {
                if let Some(title) = title {
                    draft.title = title;
                }
                if let Some(color) = color {
                    draft.color = color;
                }
                if let Some(message) = message {
                    set_message(draft, message)?;
                }
                Ok(())
            })?;
            writeln!(out, "updated note {id}")?;
        }
        Command::Delete { id } => {
            store.delete_note(id)?;
            writeln!(out, "deleted note {id}")?;
        }
        Command::Highlight {
            id,
            start,
            end,
            color,
        } => {
            let color = color.unwrap_or(config.default_highlight_color);
            edit_note(store, id, |draft| {
                if !draft.add_highlight(start, end, color) {
                    bail!("{start}..{end} is empty or outside the message");
                }
                Ok(())
            })?;
            writeln!(out, "highlighted {start}..{end} in note {id}")?;
        }
        Command::Unhighlight { id, index } => {
            edit_note(store, id, |draft| {
                draft
                    .remove_highlight(index)
                    .map(|_| ())
                    .with_context(|| format!("note {id} has no highlight #{index}"))
            })?;
            writeln!(out, "removed highlight #{index} from note {id}")?;
        }
        Command::ClearHighlights { id } => {
            edit_note(store, id, |draft| {
                draft.clear_highlights();
                Ok(())
            })?;
            writeln!(out, "cleared highlights of note {id}")?;
        }
        Command::Colors => {
            writeln!(out, "note colors:")?;
            for color in NoteColor::ALL {
                writeln!(
                    out,
                    "  {:<7} {} (card {})",
                    color,
                    color.hex(),
                    color.background_hex()
                )?;
            }
            writeln!(out, "highlight colors:")?;
            for color in HighlightColor::ALL {
                writeln!(out, "  {:<7} {}", color, color.hex())?;
            }
        }
    }
    Ok(())
}

fn edit_note(
    store: &mut NotesStore,
    id: i64,
    change: impl FnOnce(&mut NoteDraft) -> Result<()>,
) -> Result<Note> {
    let note = store
        .database()
        .get_note(id)?
        .with_context(|| format!("note {id} not found"))?;
    let mut draft = NoteDraft::from_note(&note);
    change(&mut draft)?;
    Ok(store.update_note(&draft.apply_to(&note)?)?)
}

fn set_message(draft: &mut NoteDraft, message: String) -> Result<()> {
    let chars = message.chars().count();
    if !draft.set_message(message) {
        bail!(
            "message is {chars} characters, the limit is {}",
            simplenotes_core::notes::MAX_MESSAGE_CHARS
        );
    }
    Ok(())
}

fn format_created(note: &Note) -> String {
    note.created_at_utc()
        .map(|created| created.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn highlight_badge(count: usize) -> String {
    match count {
        0 => String::new(),
        1 => "  (1 highlight)".to_string(),
        n => format!("  ({n} highlights)"),
    }
}

fn write_note(out: &mut dyn Write, note: &Note) -> Result<()> {
    let color = note.color_tag();
    writeln!(out, "#{} {}", note.id, note.title)?;
    writeln!(out, "color: {} {}", color, color.hex())?;
    writeln!(out, "created: {}", format_created(note))?;
    writeln!(out)?;
    writeln!(out, "{}", marked_message(&note.message, &note.highlights))?;

    if !note.highlights.is_empty() {
        writeln!(out)?;
        writeln!(out, "highlights:")?;
        for (index, range) in note.highlights.iter().enumerate() {
            let label = preview(&note.message, range).unwrap_or_default();
            writeln!(
                out,
                "  #{index} {}..{} {:<6} \"{label}\"",
                range.start, range.end, range.color
            )?;
        }
    }
    Ok(())
}

/// Message with each highlighted run wrapped as `[text]{Color}`.
fn marked_message(message: &str, highlights: &[HighlightRange]) -> String {
    styled_segments(message, highlights)
        .into_iter()
        .map(|segment| match segment.color {
            Some(color) => format!("[{}]{{{color}}}", segment.text),
            None => segment.text.to_string(),
        })
        .collect()
}
