use clap::{Parser, Subcommand};
use simplenotes_core::colors::{HighlightColor, NoteColor};
use std::path::PathBuf;

#[derive(Clone, Debug, Parser)]
#[command(version, about = "Short color-tagged notes with highlighted passages")]
pub struct CliConfig {
    /// Config file to use instead of the platform default.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config_file: Option<PathBuf>,

    /// Notes database to use instead of the configured one.
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Create a note.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        message: String,
        #[arg(long)]
        color: Option<NoteColor>,
    },
    /// List notes, newest first.
    List,
    /// Print one note with its highlights.
    Show { id: i64 },
    /// Replace fields of a note. Highlights are re-clipped to a new message.
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        message: Option<String>,
        #[arg(long)]
        color: Option<NoteColor>,
    },
    Delete { id: i64 },
    /// Highlight the characters `start..end` of a note's message.
    Highlight {
        id: i64,
        start: i64,
        end: i64,
        #[arg(long)]
        color: Option<HighlightColor>,
    },
    /// Remove the highlight at `index` (as numbered by `show`).
    Unhighlight { id: i64, index: usize },
    ClearHighlights { id: i64 },
    /// List the available note and highlight colors.
    Colors,
}

#[cfg(test)]
mod tests {
    use super::{CliConfig, Command};
    use clap::Parser;
    use simplenotes_core::colors::NoteColor;
    use std::path::PathBuf;

    #[test]
    fn config_and_database_overrides_parse() {
        let cli = CliConfig::try_parse_from([
            "simplenotes",
            "--config",
            "/tmp/notes/config.json",
            "--database",
            "/tmp/notes/notes.db",
            "list",
        ])
        .expect("parse");
        assert_eq!(cli.config_file, Some(PathBuf::from("/tmp/notes/config.json")));
        assert_eq!(cli.database, Some(PathBuf::from("/tmp/notes/notes.db")));
        assert!(matches!(cli.command, Command::List));
    }

    #[test]
    fn overrides_are_accepted_after_the_subcommand() {
        let cli = CliConfig::try_parse_from([
            "simplenotes",
            "add",
            "--title",
            "Groceries",
            "--color",
            "Blue",
            "--config",
            "alt.json",
        ])
        .expect("parse");
        assert_eq!(cli.config_file, Some(PathBuf::from("alt.json")));
        assert!(cli.database.is_none());
        match cli.command {
            Command::Add {
                title,
                message,
                color,
            } => {
                assert_eq!(title, "Groceries");
                assert_eq!(message, "");
                assert_eq!(color, Some(NoteColor::Blue));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_flags_and_colors_are_rejected() {
        assert!(CliConfig::try_parse_from(["simplenotes", "--config-file", "x.json", "list"]).is_err());
        assert!(
            CliConfig::try_parse_from(["simplenotes", "add", "--title", "t", "--color", "Purple"])
                .is_err()
        );
    }

    #[test]
    fn argument_definitions_are_consistent() {
        use clap::CommandFactory;
        CliConfig::command().debug_assert();
    }
}
