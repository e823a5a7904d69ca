//! Watch command - keep the index in sync with a vault directory

use crate::cli::output::colors;
use crate::cli::OutputFormat;
use crate::core::error::Result as CoreResult;
use crate::core::indexer::{
    sync_paths, AppliedChange, ChangeKind, FsDocumentSource, IndexingPipeline, VaultWatcher,
};
use crate::core::services::Services;
use clap::Args;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often the watch loop checks for shutdown
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Path to the vault to watch
    pub path: PathBuf,

    /// Debounce window for filesystem events in milliseconds
    #[arg(long, default_value = "500")]
    pub debounce_ms: u64,

    /// Skip the initial full index of the vault
    #[arg(long)]
    pub no_initial: bool,

    /// Stop after this many seconds (default: run until Ctrl-C)
    #[arg(long)]
    pub timeout_secs: Option<u64>,
}

/// Execute the watch command
pub async fn execute(
    args: WatchArgs,
    services: &Arc<Services>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = services.create_source(&args.path)?;
    let pipeline = services.create_pipeline()?;

    if !args.no_initial {
        let (_, summary) = pipeline.index_all(&source, |_| {})?;
        services.save_index()?;

        if format == OutputFormat::Human {
            println!(
                "{} {} documents ({} chunks)",
                colors::success("Indexed"),
                colors::number(&summary.documents_indexed.to_string()),
                colors::number(&summary.chunks_created.to_string())
            );
        }
    }

    if format == OutputFormat::Human {
        eprintln!(
            "Watching {} (Ctrl-C to stop)",
            colors::file_path(&source.root().display().to_string())
        );
    }

    let stop = Arc::new(AtomicBool::new(false));
    let deadline = args
        .timeout_secs
        .map(|secs| Instant::now() + Duration::from_secs(secs));

    let mut worker = {
        let stop = Arc::clone(&stop);
        let services = Arc::clone(services);
        let debounce = Duration::from_millis(args.debounce_ms);
        tokio::task::spawn_blocking(move || {
            watch_loop(&services, &pipeline, &source, debounce, deadline, &stop, format)
        })
    };

    let applied = tokio::select! {
        result = &mut worker => result??,
        _ = tokio::signal::ctrl_c() => {
            stop.store(true, Ordering::SeqCst);
            worker.await??
        }
    };

    if format == OutputFormat::Human {
        eprintln!(
            "Stopped after {} change(s)",
            colors::number(&applied.to_string())
        );
    }

    Ok(())
}

/// Blocking loop: wait for batches, apply them, persist.
/// Returns the number of applied changes.
fn watch_loop(
    services: &Services,
    pipeline: &IndexingPipeline,
    source: &FsDocumentSource,
    debounce: Duration,
    deadline: Option<Instant>,
    stop: &AtomicBool,
    format: OutputFormat,
) -> CoreResult<usize> {
    let watcher = VaultWatcher::new(source.root(), debounce)?;
    let mut total = 0;

    while !stop.load(Ordering::SeqCst) && deadline.is_none_or(|d| Instant::now() < d) {
        let Some(paths) = watcher.next_batch(POLL_INTERVAL)? else {
            continue;
        };

        let applied = sync_paths(pipeline, source, &paths);
        if applied.is_empty() {
            continue;
        }

        services.save_index()?;
        total += applied.len();

        for change in &applied {
            report(change, format);
        }
    }

    Ok(total)
}

fn report(change: &AppliedChange, format: OutputFormat) {
    match format {
        OutputFormat::Human => {
            let kind = match change.kind {
                ChangeKind::Created => colors::success("created "),
                ChangeKind::Modified => colors::warning("modified"),
                ChangeKind::Deleted => colors::error("deleted "),
            };
            println!(
                "{} {} {}",
                kind,
                colors::document_id(&change.document_id),
                colors::dim(&format!(
                    "(-{} +{})",
                    change.outcome.removed, change.outcome.inserted
                ))
            );
        }
        OutputFormat::Json => {
            // One JSON object per line so the stream can be piped
            if let Ok(line) = serde_json::to_string(change) {
                println!("{line}");
            }
        }
    }
}
