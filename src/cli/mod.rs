//! CLI adapter for vaultdex
//!
//! Provides the command-line interface over the core index. Depends on
//! `core/`; nothing in `core/` depends on it.
//!
//! ```text
//!  +------------------+
//!  |     core/        |
//!  |  (domain logic)  |
//!  +--------+---------+
//!           |
//!           v
//!  +------------------+
//!  |      cli/        |
//!  | (clap adapter)   |
//!  +------------------+
//! ```
//!
//! Every command except `completions` loads the index file first;
//! commands that mutate the index save it before returning. `import`,
//! `clear` and `index --fresh` still run when the file is corrupt.

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

/// vaultdex - chunk index for note vaults
///
/// Index a folder of markdown and text notes into overlapping chunks,
/// then search and filter them by content, type or tag.
#[derive(Parser, Debug)]
#[command(name = "vaultdex")]
#[command(version)]
#[command(about = "Chunking and retrieval index for note vaults", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for scripting
    Json,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Index every eligible document under a vault directory
    Index(commands::IndexArgs),

    /// Case-insensitive substring search over chunk content
    Search(commands::SearchArgs),

    /// List chunks, optionally filtered by document, type or tag
    Chunks(commands::ChunksArgs),

    /// Show index statistics
    Stats(commands::store::StatsArgs),

    /// Remove one document's chunks from the index
    Remove(commands::store::RemoveArgs),

    /// Remove every chunk from the index
    Clear(commands::store::ClearArgs),

    /// Export the index as JSON
    Export(commands::store::ExportArgs),

    /// Replace the index with a previously exported JSON file
    Import(commands::store::ImportArgs),

    /// Profile a single document without indexing it
    Inspect(commands::InspectArgs),

    /// Watch a vault directory and keep the index in sync
    Watch(commands::WatchArgs),

    /// Show current configuration
    #[command(name = "show-config")]
    ShowConfig(commands::ConfigArgs),

    /// Generate shell completion scripts
    ///
    /// Output completion script to stdout. To install:
    ///
    ///   bash:  vaultdex completions bash > ~/.local/share/bash-completion/completions/vaultdex
    ///   zsh:   vaultdex completions zsh > ~/.zfunc/_vaultdex
    ///   fish:  vaultdex completions fish > ~/.config/fish/completions/vaultdex.fish
    Completions(commands::CompletionsArgs),
}

impl Commands {
    /// Whether the command overwrites the whole index, so a corrupt
    /// index file must not stop it
    pub fn replaces_index(&self) -> bool {
        matches!(
            self,
            Commands::Import(_)
                | Commands::Clear(_)
                | Commands::Index(commands::IndexArgs { fresh: true, .. })
        )
    }
}

/// Load the persisted index before running `command`.
///
/// Commands that replace the index start from an empty index when the
/// file cannot be parsed; every other command fails.
pub fn load_index_for(
    command: &Commands,
    services: &crate::core::services::Services,
) -> crate::core::error::Result<()> {
    match services.load_index() {
        Ok(Some(count)) => tracing::debug!("Loaded {} chunks", count),
        Ok(None) => {}
        Err(e) if e.is_malformed_data() && command.replaces_index() => {
            tracing::warn!(
                "Ignoring unreadable index file {:?}: {}",
                services.index_file(),
                e
            );
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

/// Run the CLI with the provided arguments
pub async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::core::config::Config;
    use crate::core::services::Services;
    use crate::core::xdg::XdgDirs;
    use std::sync::Arc;

    // Handle completions command early (doesn't need services)
    if let Commands::Completions(args) = cli.command {
        return commands::completions::execute(args);
    }

    let xdg = XdgDirs::new();
    xdg.log_paths();
    xdg.ensure_dirs_exist()?;

    let config = Config::load_with_xdg(&xdg)?;
    config.log_config();

    let services = Arc::new(Services::new(config));
    load_index_for(&cli.command, &services)?;

    match cli.command {
        Commands::Index(args) => commands::index::execute(args, &services, cli.format).await,
        Commands::Search(args) => commands::search::execute(args, &services, cli.format).await,
        Commands::Chunks(args) => {
            commands::search::execute_chunks(args, &services, cli.format).await
        }
        Commands::Stats(args) => {
            commands::store::execute_stats(args, &services, cli.format).await
        }
        Commands::Remove(args) => {
            commands::store::execute_remove(args, &services, cli.format).await
        }
        Commands::Clear(args) => {
            commands::store::execute_clear(args, &services, cli.format).await
        }
        Commands::Export(args) => {
            commands::store::execute_export(args, &services, cli.format).await
        }
        Commands::Import(args) => {
            commands::store::execute_import(args, &services, cli.format).await
        }
        Commands::Inspect(args) => commands::inspect::execute(args, &services, cli.format).await,
        Commands::Watch(args) => commands::watch::execute(args, &services, cli.format).await,
        Commands::ShowConfig(args) => commands::config::execute(args, &services, cli.format).await,
        Commands::Completions(_) => unreachable!(), // Handled above
    }
}
