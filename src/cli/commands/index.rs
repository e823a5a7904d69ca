//! Index command - index a vault directory

use crate::cli::output::{colors, format_duration, print_warning};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::IndexingPolicy;
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the index command
#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Path to the vault to index
    pub path: PathBuf,

    /// Characters per chunk (overrides config)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between chunks in characters (overrides config)
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Clear the index before indexing
    #[arg(long)]
    pub fresh: bool,

    /// Suppress progress output
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

/// Indexing result response
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub path: String,
    pub documents_indexed: usize,
    pub documents_skipped: usize,
    pub documents_failed: usize,
    pub chunks_created: usize,
    pub total_chunks: usize,
    pub duration_secs: f64,
}

/// Execute the index command
pub async fn execute(
    args: IndexArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = services.create_source(&args.path).map_err(|e| {
        format!(
            "{e}. Make sure '{}' exists and is a directory.",
            args.path.display()
        )
    })?;

    let mut pipeline = services.create_pipeline()?;

    if args.chunk_size.is_some() || args.overlap.is_some() {
        let current = pipeline.policy().clone();
        let policy = IndexingPolicy::new(
            args.chunk_size.unwrap_or(current.chunk_size_chars()),
            args.overlap.unwrap_or(current.overlap_chars()),
            current.allowed_extensions(),
            current.excluded_path_substrings().iter().cloned(),
        )?
        .with_assumed_avg_line_length(current.assumed_avg_line_length())?;
        pipeline.set_policy(policy);
    }

    if args.fresh {
        services.index.clear();
    }

    let show_progress = !args.quiet && format == OutputFormat::Human;
    if show_progress {
        eprintln!(
            "Indexing {}...",
            colors::file_path(&source.root().display().to_string())
        );
    }

    let (_, summary) = pipeline.index_all(&source, |progress| {
        if show_progress && progress.processed % 100 == 0 {
            eprintln!(
                "  {}/{} documents",
                colors::number(&progress.processed.to_string()),
                progress.total
            );
        }
    })?;

    services.save_index()?;

    if summary.documents_failed > 0 && format == OutputFormat::Human {
        print_warning(&format!(
            "{} document(s) could not be read, see the warnings above",
            summary.documents_failed
        ));
    }

    let response = IndexResponse {
        path: source.root().to_string_lossy().into_owned(),
        documents_indexed: summary.documents_indexed,
        documents_skipped: summary.documents_skipped,
        documents_failed: summary.documents_failed,
        chunks_created: summary.chunks_created,
        total_chunks: services.index.len(),
        duration_secs: summary.duration_ms as f64 / 1000.0,
    };

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} documents ({} chunks) in {}",
                colors::success("Indexed"),
                colors::number(&response.documents_indexed.to_string()),
                colors::number(&response.chunks_created.to_string()),
                colors::number(&format_duration(response.duration_secs))
            );
            println!(
                "Index now holds {} chunks",
                colors::number(&response.total_chunks.to_string())
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
