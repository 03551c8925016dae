use crate::colors::{HighlightColor, NoteColor};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";
const DATABASE_FILE: &str = "notes.db";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Serde(serde_json::Error),
    ProjectDir,
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "config io error: {err}"),
            ConfigError::Serde(err) => write!(f, "invalid config file: {err}"),
            ConfigError::ProjectDir => f.write_str("could not determine the platform config directory"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Serde(err) => Some(err),
            ConfigError::ProjectDir => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct NotesConfig {
    pub database_path: Option<PathBuf>,
    pub default_note_color: NoteColor,
    pub default_highlight_color: HighlightColor,
    pub log_filter: Option<String>,
}

pub struct ConfigStore {
    config_path: PathBuf,
    data_dir: Option<PathBuf>,
}

impl ConfigStore {
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            data_dir: None,
        }
    }

    pub fn default_store() -> Result<Self, ConfigError> {
        let project_dirs =
            ProjectDirs::from("app", "simplenotes", "SimpleNotes").ok_or(ConfigError::ProjectDir)?;
        Ok(Self {
            config_path: project_dirs.config_dir().join(CONFIG_FILE),
            data_dir: Some(project_dirs.data_dir().to_path_buf()),
        })
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<NotesConfig, ConfigError> {
        if !self.config_path.exists() {
            return Ok(NotesConfig::default());
        }
        let raw = fs::read_to_string(&self.config_path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn save(&self, config: &NotesConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(config)?;
        fs::write(&self.config_path, data)?;
        Ok(())
    }

    /// Where the notes database lives: the configured path, else the
    /// platform data dir, else next to the config file.
    pub fn database_path(&self, config: &NotesConfig) -> PathBuf {
        if let Some(path) = &config.database_path {
            return path.clone();
        }
        let dir = self
            .data_dir
            .clone()
            .or_else(|| self.config_path.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        dir.join(DATABASE_FILE)
    }
}
