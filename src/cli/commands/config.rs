//! Config command - show current configuration

use crate::cli::OutputFormat;
use crate::core::services::Services;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;

/// Arguments for the config command
#[derive(Args, Debug)]
pub struct ConfigArgs {}

/// Configuration response
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub config_file: String,
    pub index_file: String,
    pub indexing: IndexingSummary,
    pub search: SearchSummary,
}

#[derive(Debug, Serialize)]
pub struct IndexingSummary {
    pub chunk_size: usize,
    pub overlap: usize,
    pub overlap_lines: usize,
    pub assumed_avg_line_length: usize,
    pub max_file_size_mb: usize,
    pub allowed_extensions: Vec<String>,
    pub excluded_paths: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchSummary {
    pub default_limit: usize,
}

/// Execute the config command
pub async fn execute(
    _args: ConfigArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = &services.config;
    let policy = config.indexing.policy()?;
    let xdg = crate::core::xdg::XdgDirs::new();

    let response = ConfigResponse {
        config_file: xdg.config_file().to_string_lossy().into_owned(),
        index_file: services.index_file().to_string_lossy().into_owned(),
        indexing: IndexingSummary {
            chunk_size: policy.chunk_size_chars(),
            overlap: policy.overlap_chars(),
            overlap_lines: policy.overlap_lines(),
            assumed_avg_line_length: policy.assumed_avg_line_length(),
            max_file_size_mb: config.indexing.max_file_size_mb,
            allowed_extensions: policy.allowed_extensions().iter().cloned().collect(),
            excluded_paths: policy.excluded_path_substrings().to_vec(),
        },
        search: SearchSummary {
            default_limit: config.search.default_limit,
        },
    };

    match format {
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  config_file: {}", response.config_file);
            println!("  index_file: {}", response.index_file);
            println!("  indexing:");
            println!("    chunk_size: {}", response.indexing.chunk_size);
            println!(
                "    overlap: {} ({} lines)",
                response.indexing.overlap, response.indexing.overlap_lines
            );
            println!(
                "    assumed_avg_line_length: {}",
                response.indexing.assumed_avg_line_length
            );
            println!("    max_file_size_mb: {}", response.indexing.max_file_size_mb);
            println!(
                "    allowed_extensions: {:?}",
                response.indexing.allowed_extensions
            );
            println!("    excluded_paths: {:?}", response.indexing.excluded_paths);
            println!("  search:");
            println!("    default_limit: {}", response.search.default_limit);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
