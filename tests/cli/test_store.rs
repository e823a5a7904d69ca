//! Tests for the index maintenance CLI commands

use crate::cli::test_helpers::setup_indexed_vault;
use crate::common::{create_test_services, TestVault};
use clap::Parser;
use serial_test::serial;
use std::env;
use std::fs;
use vaultdex::cli::commands::store::{
    execute_clear, execute_export, execute_import, execute_remove, execute_stats, ClearArgs,
    ExportArgs, ImportArgs, RemoveArgs, StatsArgs,
};
use vaultdex::cli::commands::index::{self, IndexArgs};
use vaultdex::cli::{load_index_for, run, Cli, Commands, OutputFormat};
use vaultdex::core::services::Services;

/// Test stats in both formats
#[tokio::test]
async fn test_stats() {
    let (services, _storage, _vault) = setup_indexed_vault();

    for format in [OutputFormat::Human, OutputFormat::Json] {
        let result = execute_stats(StatsArgs {}, &services, format).await;
        assert!(result.is_ok(), "Stats should succeed: {:?}", result.err());
    }
}

/// Test stats before anything was saved
#[tokio::test]
async fn test_stats_empty_index() {
    let (services, _storage) = create_test_services();

    let result = execute_stats(StatsArgs {}, &services, OutputFormat::Human).await;

    assert!(result.is_ok());
}

/// Test remove drops the document and persists the change
#[tokio::test]
async fn test_remove_document() {
    let (services, _storage, _vault) = setup_indexed_vault();

    let result = execute_remove(
        RemoveArgs {
            document_id: "inbox.txt".to_string(),
        },
        &services,
        OutputFormat::Json,
    )
    .await;

    assert!(result.is_ok(), "Remove should succeed: {:?}", result.err());
    assert!(!services.index.contains_document("inbox.txt"));

    let reloaded = Services::new((*services.config).clone());
    reloaded.load_index().unwrap();
    assert!(!reloaded.index.contains_document("inbox.txt"));
    assert_eq!(reloaded.index.len(), services.index.len());
}

/// Test removing an unknown document is a no-op, not an error
#[tokio::test]
async fn test_remove_unknown_document() {
    let (services, _storage, _vault) = setup_indexed_vault();
    let before = services.index.len();

    let result = execute_remove(
        RemoveArgs {
            document_id: "nope.md".to_string(),
        },
        &services,
        OutputFormat::Human,
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(services.index.len(), before);
}

/// Test clear with --force
#[tokio::test]
async fn test_clear_force() {
    let (services, _storage, _vault) = setup_indexed_vault();

    let result = execute_clear(ClearArgs { force: true }, &services, OutputFormat::Json).await;

    assert!(result.is_ok(), "Clear should succeed: {:?}", result.err());
    assert!(services.index.is_empty());
    assert_eq!(fs::read_to_string(services.index_file()).unwrap().trim(), "[]");
}

/// Test export to a file followed by import into fresh services
#[tokio::test]
async fn test_export_then_import() {
    let (services, storage, _vault) = setup_indexed_vault();
    let export_path = storage.path().join("export.json");

    let result = execute_export(
        ExportArgs {
            output: Some(export_path.clone()),
        },
        &services,
        OutputFormat::Human,
    )
    .await;
    assert!(result.is_ok(), "Export should succeed: {:?}", result.err());

    let (target, _target_storage) = create_test_services();
    let result = execute_import(
        ImportArgs { file: export_path },
        &target,
        OutputFormat::Json,
    )
    .await;

    assert!(result.is_ok(), "Import should succeed: {:?}", result.err());
    assert_eq!(target.index.chunks(), services.index.chunks());
    assert!(target.index_file().exists());
}

/// Test malformed import leaves the index untouched
#[tokio::test]
async fn test_import_malformed_file() {
    let (services, storage, _vault) = setup_indexed_vault();
    let before = services.index.chunks();
    let bad = storage.path().join("bad.json");
    fs::write(&bad, "[{\"id\": 1}]").unwrap();

    let result = execute_import(ImportArgs { file: bad }, &services, OutputFormat::Human).await;

    assert!(result.is_err());
    assert_eq!(services.index.chunks(), before);
}

/// Test import of a missing file
#[tokio::test]
async fn test_import_missing_file() {
    let (services, storage) = create_test_services();

    let result = execute_import(
        ImportArgs {
            file: storage.path().join("absent.json"),
        },
        &services,
        OutputFormat::Human,
    )
    .await;

    assert!(result.is_err());
}

/// Test import recovers from a corrupt index file
#[tokio::test]
async fn test_import_over_corrupt_index_file() {
    let (source, storage, _vault) = setup_indexed_vault();
    let good = storage.path().join("good.json");
    fs::write(&good, source.index.export_all().unwrap()).unwrap();

    let (services, _target_storage) = create_test_services();
    fs::write(services.index_file(), "{ truncated").unwrap();

    let command = Commands::Import(ImportArgs { file: good.clone() });
    let loaded = load_index_for(&command, &services);
    assert!(loaded.is_ok(), "Load should tolerate corrupt file: {:?}", loaded.err());

    let result = execute_import(ImportArgs { file: good }, &services, OutputFormat::Json).await;

    assert!(result.is_ok(), "Import should succeed: {:?}", result.err());
    assert_eq!(services.index.chunks(), source.index.chunks());

    let reloaded = Services::new((*services.config).clone());
    assert_eq!(reloaded.load_index().unwrap(), Some(source.index.len()));
}

/// Test clear --force and index --fresh also tolerate a corrupt index file
#[tokio::test]
async fn test_reset_commands_over_corrupt_index_file() {
    let (services, _storage) = create_test_services();
    fs::write(services.index_file(), "{ truncated").unwrap();

    let clear = Commands::Clear(ClearArgs { force: true });
    assert!(load_index_for(&clear, &services).is_ok());
    let result = execute_clear(ClearArgs { force: true }, &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "Clear should succeed: {:?}", result.err());
    assert_eq!(fs::read_to_string(services.index_file()).unwrap().trim(), "[]");

    fs::write(services.index_file(), "{ truncated").unwrap();
    let vault = TestVault::small();
    let fresh = || IndexArgs {
        path: vault.path().to_path_buf(),
        chunk_size: None,
        overlap: None,
        fresh: true,
        quiet: true,
    };
    assert!(load_index_for(&Commands::Index(fresh()), &services).is_ok());
    let result = index::execute(fresh(), &services, OutputFormat::Json).await;
    assert!(result.is_ok(), "Fresh index should succeed: {:?}", result.err());
    assert_eq!(services.index.stats().total_documents, 6);
}

/// Test commands that read the index still report a corrupt file
#[test]
fn test_corrupt_index_file_fails_read_commands() {
    let (services, _storage) = create_test_services();
    fs::write(services.index_file(), "{ truncated").unwrap();

    let stats = Commands::Stats(StatsArgs {});
    let result = load_index_for(&stats, &services);
    assert!(result.unwrap_err().is_malformed_data());

    let vault = TestVault::small();
    let append = Commands::Index(IndexArgs {
        path: vault.path().to_path_buf(),
        chunk_size: None,
        overlap: None,
        fresh: false,
        quiet: true,
    });
    assert!(load_index_for(&append, &services).is_err());
}

/// Test the full CLI entry point imports over a corrupt index file
#[tokio::test]
#[serial]
async fn test_run_import_over_corrupt_index_file() {
    let (source, storage, _vault) = setup_indexed_vault();
    let good = storage.path().join("good.json");
    fs::write(&good, source.index.export_all().unwrap()).unwrap();

    let index_file = storage.path().join("cli-index.json");
    fs::write(&index_file, "{ truncated").unwrap();

    env::remove_var("VAULTDEX_CONFIG");
    env::set_var("VAULTDEX_CONFIG_DIR", storage.path().join("config"));
    env::set_var("VAULTDEX_DATA_DIR", storage.path().join("data"));
    env::set_var("VAULTDEX_INDEX_FILE", &index_file);

    let import = Cli::parse_from(["vaultdex", "--format", "json", "import", good.to_str().unwrap()]);
    let imported = run(import).await.map_err(|e| e.to_string());

    fs::write(&index_file, "{ truncated").unwrap();
    let clear = Cli::parse_from(["vaultdex", "--format", "json", "clear", "--force"]);
    let cleared = run(clear).await.map_err(|e| e.to_string());

    env::remove_var("VAULTDEX_CONFIG_DIR");
    env::remove_var("VAULTDEX_DATA_DIR");
    env::remove_var("VAULTDEX_INDEX_FILE");

    assert!(imported.is_ok(), "Import should succeed: {:?}", imported.err());
    assert!(cleared.is_ok(), "Clear should succeed: {:?}", cleared.err());
    assert_eq!(fs::read_to_string(&index_file).unwrap().trim(), "[]");
}
