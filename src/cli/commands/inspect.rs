//! Inspect command - profile one document without touching the index

use crate::cli::output::{colors, print_chunk, print_header};
use crate::cli::OutputFormat;
use crate::core::indexer::{detect_content_type, profile_document, DocumentProfile};
use crate::core::services::Services;
use crate::core::types::{Chunk, ContentType, Document};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// File to inspect
    pub file: PathBuf,

    /// Also show how the file would be chunked
    #[arg(long)]
    pub chunks: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectResponse {
    pub file: String,
    pub eligible: bool,
    pub content_type: ContentType,
    pub profile: DocumentProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunks: Option<Vec<Chunk>>,
}

/// Execute the inspect command
pub async fn execute(
    args: InspectArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(&args.file)
        .map_err(|e| format!("Cannot read '{}': {e}", args.file.display()))?;

    let pipeline = services.create_pipeline()?;
    let id = args.file.to_string_lossy().replace('\\', "/");

    let chunks = args.chunks.then(|| {
        let document = Document::from_epoch_millis(id.clone(), text.clone(), 0, 0);
        pipeline.chunker().chunk_document(&document)
    });

    let response = InspectResponse {
        eligible: pipeline.gate().should_index_path(&args.file),
        content_type: detect_content_type(&text),
        profile: profile_document(&text),
        chunks,
        file: id,
    };

    match format {
        OutputFormat::Human => {
            let profile = &response.profile;
            print_header(&response.file);
            println!(
                "  {}: {}",
                colors::label("Eligible"),
                if response.eligible {
                    colors::success("yes")
                } else {
                    colors::warning("no")
                }
            );
            println!(
                "  {}: {}",
                colors::label("Content type"),
                colors::content_type(response.content_type.as_str())
            );
            println!(
                "  {}: {} words, {} chars, ~{} min read",
                colors::label("Size"),
                colors::number(&profile.word_count.to_string()),
                colors::number(&profile.character_count.to_string()),
                colors::number(&profile.reading_time_minutes.to_string())
            );
            println!(
                "  {}: {}",
                colors::label("Keywords"),
                profile.keywords.join(", ")
            );
            println!(
                "  {}: {}",
                colors::label("Categories"),
                profile.categories.join(", ")
            );
            let tags: Vec<String> = profile.tags.iter().map(|t| format!("#{t}")).collect();
            println!("  {}: {}", colors::label("Tags"), colors::tag(&tags.join(" ")));

            if let Some(chunks) = &response.chunks {
                println!();
                for (i, chunk) in chunks.iter().enumerate() {
                    print_chunk(i + 1, chunk, true);
                }
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
