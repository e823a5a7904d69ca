//! Index maintenance commands - stats, remove, clear, export, import

use crate::cli::output::{colors, format_bytes, print_header, print_success};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::IndexStats;
use clap::Args;
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for stats
#[derive(Args, Debug)]
pub struct StatsArgs {}

/// Arguments for remove
#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Document id (vault-relative path)
    pub document_id: String,
}

/// Arguments for clear
#[derive(Args, Debug)]
pub struct ClearArgs {
    /// Skip confirmation prompt
    #[arg(long, short = 'f')]
    pub force: bool,
}

/// Arguments for export
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Arguments for import
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// File produced by `export`
    pub file: PathBuf,
}

/// Stats response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: IndexStats,
    pub index_file: String,
    pub index_file_bytes: Option<u64>,
}

/// Execute stats command
pub async fn execute_stats(
    _args: StatsArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let index_file = services.index_file();
    let response = StatsResponse {
        stats: services.index.stats(),
        index_file_bytes: fs::metadata(&index_file).ok().map(|m| m.len()),
        index_file: index_file.to_string_lossy().into_owned(),
    };

    match format {
        OutputFormat::Human => {
            let stats = &response.stats;
            print_header("Index");
            println!(
                "  {}: {}",
                colors::label("Documents"),
                colors::number(&stats.total_documents.to_string())
            );
            println!(
                "  {}: {}",
                colors::label("Chunks"),
                colors::number(&stats.total_chunks.to_string())
            );
            println!(
                "  {}: {} chars",
                colors::label("Average chunk"),
                colors::number(&stats.average_chunk_size.to_string())
            );
            println!(
                "  {}: {} {}",
                colors::label("File"),
                colors::file_path(&response.index_file),
                colors::dim(
                    &response
                        .index_file_bytes
                        .map(format_bytes)
                        .unwrap_or_else(|| "(not saved yet)".to_string())
                )
            );
            if !stats.type_distribution.is_empty() {
                println!("  {}:", colors::label("Content types"));
                for (content_type, count) in &stats.type_distribution {
                    println!(
                        "    {:<14} {}",
                        colors::content_type(content_type.as_str()),
                        colors::number(&count.to_string())
                    );
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Execute remove command
pub async fn execute_remove(
    args: RemoveArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let removed = services.index.remove_document(&args.document_id);
    if removed > 0 {
        services.save_index()?;
    }

    match format {
        OutputFormat::Human => {
            if removed == 0 {
                println!(
                    "{} '{}' is not indexed",
                    colors::dim("Nothing to remove:"),
                    colors::document_id(&args.document_id)
                );
            } else {
                println!(
                    "{} {} chunk(s) of '{}'",
                    colors::success("Removed"),
                    colors::number(&removed.to_string()),
                    colors::document_id(&args.document_id)
                );
            }
        }
        OutputFormat::Json => {
            let response = serde_json::json!({
                "documentId": args.document_id,
                "removed": removed
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Execute clear command
pub async fn execute_clear(
    args: ClearArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    // Confirmation prompt unless --force
    if !args.force {
        print!(
            "Remove all {} chunks from the index? [y/N] ",
            colors::number(&services.index.len().to_string())
        );
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("{}", colors::dim("Cancelled."));
            return Ok(());
        }
    }

    let dropped = services.index.clear();
    services.save_index()?;

    match format {
        OutputFormat::Human => {
            print_success(&format!("Cleared {dropped} chunk(s)"));
        }
        OutputFormat::Json => {
            let response = serde_json::json!({ "cleared": dropped });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

/// Execute export command.
///
/// The export is the same JSON array in every output format.
pub async fn execute_export(
    args: ExportArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let json = services.index.export_all()?;

    match args.output {
        Some(path) => {
            fs::write(&path, json)?;
            if format == OutputFormat::Human {
                eprintln!(
                    "{} {} chunks to {}",
                    colors::success("Exported"),
                    colors::number(&services.index.len().to_string()),
                    colors::file_path(&path.display().to_string())
                );
            }
        }
        None => println!("{json}"),
    }

    Ok(())
}

/// Execute import command
pub async fn execute_import(
    args: ImportArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read_to_string(&args.file).map_err(|e| {
        format!("Cannot read '{}': {e}", args.file.display())
    })?;

    let count = services.index.import_all(&data)?;
    services.save_index()?;

    match format {
        OutputFormat::Human => {
            println!(
                "{} {} chunks from {}",
                colors::success("Imported"),
                colors::number(&count.to_string()),
                colors::file_path(&args.file.display().to_string())
            );
        }
        OutputFormat::Json => {
            let response = serde_json::json!({ "imported": count });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
