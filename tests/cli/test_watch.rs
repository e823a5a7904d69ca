//! Tests for the watch CLI command
//!
//! Every test bounds the run with `timeout_secs`.

use crate::common::{create_test_services, TestVault};
use vaultdex::cli::commands::watch::{execute, WatchArgs};
use vaultdex::cli::OutputFormat;

/// Test the initial index runs and the loop stops on its deadline
#[tokio::test]
async fn test_watch_initial_index_and_timeout() {
    let (services, _storage) = create_test_services();
    let vault = TestVault::small();

    let result = execute(
        WatchArgs {
            path: vault.path().to_path_buf(),
            debounce_ms: 100,
            no_initial: false,
            timeout_secs: Some(1),
        },
        &services,
        OutputFormat::Json,
    )
    .await;

    assert!(result.is_ok(), "Watch should succeed: {:?}", result.err());
    assert_eq!(services.index.stats().total_documents, 6);
    assert!(services.index_file().exists());
}

/// Test --no-initial leaves the index alone
#[tokio::test]
async fn test_watch_no_initial() {
    let (services, _storage) = create_test_services();
    let vault = TestVault::small();

    let result = execute(
        WatchArgs {
            path: vault.path().to_path_buf(),
            debounce_ms: 100,
            no_initial: true,
            timeout_secs: Some(1),
        },
        &services,
        OutputFormat::Human,
    )
    .await;

    assert!(result.is_ok(), "Watch should succeed: {:?}", result.err());
    assert!(services.index.is_empty());
}

/// Test watching a missing directory fails before starting
#[tokio::test]
async fn test_watch_missing_path() {
    let (services, storage) = create_test_services();

    let result = execute(
        WatchArgs {
            path: storage.path().join("nowhere"),
            debounce_ms: 100,
            no_initial: false,
            timeout_secs: Some(1),
        },
        &services,
        OutputFormat::Human,
    )
    .await;

    assert!(result.is_err());
}
