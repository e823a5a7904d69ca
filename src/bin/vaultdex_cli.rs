//! vaultdex CLI - build and query a chunk index over a note vault
//!
//! # Examples
//!
//! ```bash
//! # Index a vault
//! vaultdex index ~/notes
//!
//! # Search chunk content
//! vaultdex search "quarterly review"
//!
//! # List task-list chunks tagged #work
//! vaultdex chunks --type task-list --tag work
//!
//! # Keep the index in sync while editing
//! vaultdex watch ~/notes
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vaultdex::cli::output::print_error;
use vaultdex::cli::{run, Cli};

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays clean for --format json
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "vaultdex=warn".into()));
    let json_logs =
        std::env::var("VAULTDEX_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json_logs {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}
