mod cli;
mod commands;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use cli::CliConfig;
use simplenotes_core::app::{load_workspace, open_workspace_database};
use simplenotes_core::config::ConfigStore;
use simplenotes_core::store::NotesStore;

fn main() -> Result<()> {
    let cli_config = CliConfig::parse();

    let config_store = match &cli_config.config_file {
        Some(path) => ConfigStore::new(path.clone()),
        None => ConfigStore::default_store()?,
    };
    let workspace = load_workspace(&config_store, cli_config.database.as_deref())
        .with_context(|| format!("loading {}", config_store.config_path().display()))?;

    logging::init_logging(workspace.config.log_filter.as_deref());
    tracing::debug!(database = %workspace.database_path.display(), "using notes database");

    let db = open_workspace_database(&workspace)
        .with_context(|| format!("opening {}", workspace.database_path.display()))?;
    let mut store = NotesStore::new(db)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    commands::run(cli_config.command, &mut store, &workspace.config, &mut out)
}
