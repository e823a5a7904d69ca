//! Search and chunks commands - query the index

use crate::cli::output::{colors, print_chunk};
use crate::cli::OutputFormat;
use crate::core::services::Services;
use crate::core::types::{Chunk, ContentType};
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text to look for (case-insensitive substring)
    pub query: String,

    /// Maximum number of results to show (defaults to config)
    #[arg(long, short = 'k')]
    pub limit: Option<usize>,

    /// Only show chunk ids (no content)
    #[arg(long)]
    pub ids_only: bool,
}

/// Arguments for the chunks command
#[derive(Args, Debug)]
pub struct ChunksArgs {
    /// Only chunks of this document id
    #[arg(long, short = 'd')]
    pub document: Option<String>,

    /// Only chunks of this content type
    #[arg(long = "type", short = 't')]
    pub content_type: Option<ContentType>,

    /// Only chunks carrying this tag (with or without '#')
    #[arg(long)]
    pub tag: Option<String>,

    /// Maximum number of chunks to show (defaults to config)
    #[arg(long, short = 'k')]
    pub limit: Option<usize>,

    /// Only show chunk ids (no content)
    #[arg(long)]
    pub ids_only: bool,
}

/// Chunk listing response shared by both commands
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkListOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub total_matches: usize,
    pub shown: usize,
    pub chunks: Vec<Chunk>,
}

/// Execute the search command
pub async fn execute(
    args: SearchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let matches = services.index.search(&args.query);
    let limit = args.limit.unwrap_or(services.config.search.default_limit);

    let output = build_output(Some(args.query.clone()), matches, limit);

    match format {
        OutputFormat::Human => {
            if output.chunks.is_empty() {
                println!("No results found for '{}'", colors::label(&args.query));
            } else {
                println!(
                    "Found {} chunk(s), showing {}:\n",
                    colors::number(&output.total_matches.to_string()),
                    colors::number(&output.shown.to_string())
                );
                print_chunks(&output.chunks, args.ids_only);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

/// Execute the chunks command.
///
/// Filters combine: a chunk must satisfy every filter given.
pub async fn execute_chunks(
    args: ChunksArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut matches = match (&args.document, &args.tag) {
        (Some(document), _) => services.index.get_by_document(document),
        (None, Some(tag)) => services.index.get_by_tag(tag.trim_start_matches('#')),
        (None, None) => match args.content_type {
            Some(content_type) => services.index.get_by_content_type(content_type),
            None => services.index.chunks(),
        },
    };

    if let Some(tag) = &args.tag {
        let tag = tag.trim_start_matches('#');
        matches.retain(|c| c.metadata.tags.contains(tag));
    }
    if let Some(content_type) = args.content_type {
        matches.retain(|c| c.metadata.content_type == content_type);
    }

    let limit = args.limit.unwrap_or(services.config.search.default_limit);
    let output = build_output(None, matches, limit);

    match format {
        OutputFormat::Human => {
            if output.chunks.is_empty() {
                println!("{}", colors::dim("No matching chunks."));
            } else {
                println!(
                    "{} chunk(s), showing {}:\n",
                    colors::number(&output.total_matches.to_string()),
                    colors::number(&output.shown.to_string())
                );
                print_chunks(&output.chunks, args.ids_only);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn build_output(query: Option<String>, mut matches: Vec<Chunk>, limit: usize) -> ChunkListOutput {
    let total_matches = matches.len();
    matches.truncate(limit);

    ChunkListOutput {
        query,
        total_matches,
        shown: matches.len(),
        chunks: matches,
    }
}

fn print_chunks(chunks: &[Chunk], ids_only: bool) {
    for (i, chunk) in chunks.iter().enumerate() {
        if ids_only {
            println!("{}", colors::document_id(&chunk.id));
        } else {
            print_chunk(i + 1, chunk, true);
        }
    }
}
