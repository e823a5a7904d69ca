//! ChunkIndex behaviour with chunks produced by the real chunker

use crate::common::{doc, scenario_policy};
use std::sync::Arc;
use std::thread;
use vaultdex::core::indexer::{Chunker, IndexingPipeline};
use vaultdex::core::storage::ChunkIndex;
use vaultdex::core::types::{IndexingPolicy, UpsertOutcome};
use vaultdex::VaultdexError;

fn scenario_pipeline() -> IndexingPipeline {
    IndexingPipeline::new(scenario_policy(), Arc::new(ChunkIndex::new()))
}

#[test]
fn test_search_finds_body_text() {
    let pipeline = scenario_pipeline();
    pipeline.index_document(&doc(
        "notes/a.md",
        "# Title\nSome body text that is somewhat long\nMore text",
    ));

    let results = pipeline.index().search("BODY");

    assert_eq!(results.len(), 1);
    assert!(results[0].content.contains("Some body text"));
    assert!(pipeline.index().search("absent").is_empty());
}

#[test]
fn test_remove_unknown_document_leaves_index_untouched() {
    let pipeline = scenario_pipeline();
    pipeline.index_document(&doc("notes/a.md", "hello"));
    let before = pipeline.index().export_all().unwrap();

    assert_eq!(pipeline.remove_document("notes/missing.md"), 0);
    assert_eq!(pipeline.index().export_all().unwrap(), before);
}

#[test]
fn test_shrinking_document_leaves_no_stale_chunks() {
    // Every 18-character line fills a chunk on its own
    let policy = IndexingPolicy::new(15, 0, [".md"], Vec::<String>::new()).unwrap();
    let pipeline = IndexingPipeline::new(policy, Arc::new(ChunkIndex::new()));
    let long: String = (0..10).map(|i| format!("paragraph number {i}\n")).collect();

    let first = pipeline.index_document(&doc("notes/a.md", &long));
    assert_eq!(first.len(), 10);

    let replacement = pipeline
        .chunker()
        .chunk_document(&doc("notes/a.md", "short"));
    let outcome = pipeline.index().upsert_document("notes/a.md", replacement);

    assert_eq!(
        outcome,
        UpsertOutcome {
            removed: 10,
            inserted: 1
        }
    );
    let remaining = pipeline.index().get_by_document("notes/a.md");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "notes/a.md-0");
}

#[test]
fn test_readers_never_see_partial_replacement() {
    let index = Arc::new(ChunkIndex::new());
    let policy = IndexingPolicy::new(10, 0, [".md"], Vec::<String>::new()).unwrap();
    let chunker = Chunker::new(&policy);

    let small = chunker.chunk_document(&doc("notes/a.md", "aaaaaaaaaa\nbbbbbbbbbb\ncccccccccc"));
    let large = chunker.chunk_document(&doc(
        "notes/a.md",
        "dddddddddd\neeeeeeeeee\nffffffffff\ngggggggggg\nhhhhhhhhhh",
    ));
    assert_eq!((small.len(), large.len()), (3, 5));
    index.upsert_document("notes/a.md", small.clone());

    thread::scope(|scope| {
        let writer_index = Arc::clone(&index);
        scope.spawn(move || {
            for round in 0..500 {
                let next = if round % 2 == 0 { &large } else { &small };
                writer_index.upsert_document("notes/a.md", next.clone());
            }
        });

        for _ in 0..2 {
            let reader_index = Arc::clone(&index);
            scope.spawn(move || {
                for _ in 0..500 {
                    let seen = reader_index.get_by_document("notes/a.md");
                    assert!(
                        seen.len() == 3 || seen.len() == 5,
                        "observed a partial chunk set of {} chunks",
                        seen.len()
                    );
                }
            });
        }
    });
}

#[test]
fn test_stats_survive_export_import() {
    let pipeline = scenario_pipeline();
    pipeline.index_document(&doc("notes/a.md", "# Title\n## Sub\nbody"));
    pipeline.index_document(&doc("notes/b.md", "- [ ] task #todo"));
    let stats = pipeline.index().stats();
    let exported = pipeline.index().export_all().unwrap();

    let restored = ChunkIndex::new();
    let count = restored.import_all(&exported).unwrap();

    assert_eq!(count, stats.total_chunks);
    assert_eq!(restored.stats(), stats);
    assert_eq!(restored.chunks(), pipeline.index().chunks());
}

#[test]
fn test_import_rejects_unknown_fields() {
    let pipeline = scenario_pipeline();
    pipeline.index_document(&doc("notes/a.md", "hello"));
    let exported = pipeline.index().export_all().unwrap();
    let tampered = exported.replacen("\"content\"", "\"surprise\": 1,\n    \"content\"", 1);

    let target = scenario_pipeline();
    target.index_document(&doc("notes/keep.md", "keep me"));
    let result = target.index().import_all(&tampered);

    assert!(matches!(result, Err(VaultdexError::MalformedIndexData(_))));
    assert_eq!(target.index().document_ids(), vec!["notes/keep.md"]);
}

#[test]
fn test_import_rejects_non_array() {
    let index = ChunkIndex::new();

    let result = index.import_all("{\"chunks\": []}");

    assert!(matches!(result, Err(VaultdexError::MalformedIndexData(_))));
}
