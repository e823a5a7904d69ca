//! Batch indexing of on-disk vaults through Services

use crate::common::{create_test_services, index_test_vault, TestVault};
use std::fs;
use vaultdex::core::indexer::{DocumentSource, FsDocumentSource, IngestionGate};
use vaultdex::core::types::{ContentType, IndexingPolicy};

#[test]
fn test_index_small_vault() {
    let (services, _temp) = create_test_services();
    let vault = TestVault::small();

    let summary = index_test_vault(&services, vault.path());

    assert_eq!(summary.documents_indexed, 6);
    assert_eq!(summary.documents_failed, 0);
    assert_eq!(summary.chunks_created, 6);
    assert_eq!(
        services.index.document_ids(),
        vec![
            "daily/2025-01-06.md",
            "data/settings.json",
            "inbox.txt",
            "projects/roadmap.md",
            "reference/shortcuts.md",
            "snippets/debounce.md",
        ]
    );
}

#[test]
fn test_vault_content_types() {
    let (services, _temp) = create_test_services();
    let vault = TestVault::small();
    index_test_vault(&services, vault.path());

    let type_of = |id: &str| services.index.get_by_document(id)[0].metadata.content_type;

    assert_eq!(type_of("projects/roadmap.md"), ContentType::Documentation);
    assert_eq!(type_of("daily/2025-01-06.md"), ContentType::TaskList);
    assert_eq!(type_of("reference/shortcuts.md"), ContentType::Table);
    assert_eq!(type_of("snippets/debounce.md"), ContentType::Code);
    assert_eq!(type_of("inbox.txt"), ContentType::Text);

    let stats = services.index.stats();
    assert_eq!(stats.total_documents, 6);
    assert_eq!(stats.type_distribution.get(&ContentType::Text), Some(&2));
}

#[test]
fn test_vault_tags() {
    let (services, _temp) = create_test_services();
    let vault = TestVault::small();
    index_test_vault(&services, vault.path());

    let planning = services.index.get_by_tag("planning");
    assert_eq!(planning.len(), 1);
    assert_eq!(planning[0].metadata.document_id, "projects/roadmap.md");

    let work = services.index.get_by_tag("work");
    assert_eq!(work.len(), 1);
    assert_eq!(work[0].metadata.document_id, "daily/2025-01-06.md");

    assert!(services.index.get_by_tag("vendored").is_empty());
}

#[test]
fn test_reindexing_vault_is_idempotent() {
    let (services, _temp) = create_test_services();
    let vault = TestVault::many(12);

    index_test_vault(&services, vault.path());
    let first = services.index.chunks();

    index_test_vault(&services, vault.path());
    let second = services.index.chunks();

    assert_eq!(first.len(), second.len());
    let mut first_ids: Vec<_> = first.iter().map(|c| c.id.clone()).collect();
    let mut second_ids: Vec<_> = second.iter().map(|c| c.id.clone()).collect();
    first_ids.sort();
    second_ids.sort();
    assert_eq!(first_ids, second_ids);
}

#[test]
fn test_edited_file_replaces_old_chunks() {
    let (services, _temp) = create_test_services();
    let vault = TestVault::with_files(&[("note.md", "original wording")]);
    index_test_vault(&services, vault.path());

    fs::write(vault.path().join("note.md"), "rewritten entirely").unwrap();
    index_test_vault(&services, vault.path());

    assert!(services.index.search("original").is_empty());
    assert_eq!(services.index.search("rewritten").len(), 1);
    assert_eq!(services.index.len(), 1);
}

#[test]
fn test_unreadable_file_counts_as_failed() {
    let (services, _temp) = create_test_services();
    let vault = TestVault::with_files(&[("good.md", "fine")]);
    fs::write(vault.path().join("broken.md"), [0xff, 0xfe, 0x00, 0x9f]).unwrap();

    let summary = index_test_vault(&services, vault.path());

    assert_eq!(summary.documents_indexed, 1);
    assert_eq!(summary.documents_failed, 1);
    assert!(!services.index.contains_document("broken.md"));
}

#[test]
fn test_progress_reports_every_document() {
    let (services, _temp) = create_test_services();
    let vault = TestVault::many(5);
    let source = services.create_source(vault.path()).unwrap();
    let pipeline = services.create_pipeline().unwrap();

    let mut seen = Vec::new();
    pipeline
        .index_all(&source, |progress| {
            seen.push((progress.processed, progress.total))
        })
        .unwrap();

    assert_eq!(seen, vec![(1, 5), (2, 5), (3, 5), (4, 5), (5, 5)]);
}

#[test]
fn test_custom_gate_on_fs_source() {
    let vault = TestVault::small();
    let policy = IndexingPolicy::new(1000, 200, ["txt"], ["inbox"]).unwrap();
    let source = FsDocumentSource::new(vault.path(), IngestionGate::new(&policy), 10).unwrap();

    let listed = source.list_eligible_documents().unwrap();

    assert!(listed.is_empty(), "unexpected documents: {listed:?}");
}

#[test]
fn test_missing_vault_is_rejected() {
    let (services, temp) = create_test_services();

    let result = services.create_source(&temp.path().join("nope"));

    assert!(result.is_err());
}
