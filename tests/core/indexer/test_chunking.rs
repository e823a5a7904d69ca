//! Chunk boundary, id and metadata tests through the public API

use crate::common::{assert_contiguous_ids, assert_covers_all_lines, doc, scenario_policy};
use vaultdex::core::indexer::{Chunker, IngestionGate};
use vaultdex::core::types::{ContentType, IndexingPolicy};

fn numbered_lines(count: usize) -> String {
    (0..count)
        .map(|i| format!("line {i:02} with some filler text"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_reference_scenario_gate() {
    let gate = IngestionGate::new(&scenario_policy());

    assert!(gate.should_index("notes/a.md", ".md"));
    assert!(!gate.should_index(".git/config.md", ".md"));
}

#[test]
fn test_reference_scenario_chunks() {
    let chunker = Chunker::new(&scenario_policy());
    let document = doc(
        "notes/a.md",
        "# Title\nSome body text that is somewhat long\nMore text",
    );

    let chunks = chunker.chunk_document(&document);

    // 8 + 37 chars stay below 50; the third line is also the last one
    assert_eq!(chunks.len(), 1);
    let chunk = &chunks[0];
    assert_eq!(chunk.id, "notes/a.md-0");
    assert_eq!(chunk.metadata.start_line, 0);
    assert_eq!(chunk.metadata.end_line, 2);
    assert!(chunk.content.starts_with("# Title"));
    assert_eq!(chunk.metadata.content_type, ContentType::Text);
}

#[test]
fn test_long_document_is_fully_covered() {
    let policy = IndexingPolicy::new(100, 50, [".md"], Vec::<String>::new()).unwrap();
    let chunker = Chunker::new(&policy);
    let document = doc("notes/long.md", &numbered_lines(40));

    let chunks = chunker.chunk_document(&document);

    assert!(chunks.len() > 1);
    assert_contiguous_ids("notes/long.md", &chunks);
    assert_covers_all_lines(&chunks, 39);
}

#[test]
fn test_one_line_overlap_between_neighbours() {
    // 50 overlap chars at 50 chars per line carries one line
    let policy = IndexingPolicy::new(100, 50, [".md"], Vec::<String>::new()).unwrap();
    let chunker = Chunker::new(&policy);
    let chunks = chunker.chunk_document(&doc("notes/long.md", &numbered_lines(40)));

    for pair in chunks.windows(2) {
        assert_eq!(pair[1].metadata.start_line, pair[0].metadata.end_line);
        let carried = pair[0].content.lines().last().unwrap();
        assert!(pair[1].content.starts_with(carried));
    }
}

#[test]
fn test_no_overlap_when_below_one_line() {
    let policy = IndexingPolicy::new(100, 49, [".md"], Vec::<String>::new()).unwrap();
    let chunker = Chunker::new(&policy);
    let chunks = chunker.chunk_document(&doc("notes/long.md", &numbered_lines(40)));

    for pair in chunks.windows(2) {
        assert_eq!(pair[1].metadata.start_line, pair[0].metadata.end_line + 1);
    }
}

#[test]
fn test_custom_line_length_changes_overlap() {
    let policy = IndexingPolicy::new(100, 50, [".md"], Vec::<String>::new())
        .unwrap()
        .with_assumed_avg_line_length(25)
        .unwrap();
    let chunker = Chunker::new(&policy);
    assert_eq!(chunker.overlap_lines(), 2);

    let chunks = chunker.chunk_document(&doc("notes/long.md", &numbered_lines(40)));
    for pair in chunks.windows(2) {
        assert_eq!(pair[1].metadata.start_line + 1, pair[0].metadata.end_line);
    }
}

#[test]
fn test_blank_buffers_do_not_leave_id_gaps() {
    let policy = IndexingPolicy::new(10, 0, [".md"], Vec::<String>::new()).unwrap();
    let chunker = Chunker::new(&policy);
    let document = doc("notes/gaps.md", "aaaaaaaaaa\n          \nbbbbbbbbbb");

    let chunks = chunker.chunk_document(&document);

    assert_eq!(chunks.len(), 2);
    assert_contiguous_ids("notes/gaps.md", &chunks);
    assert_eq!(chunks[0].content, "aaaaaaaaaa");
    assert_eq!(chunks[1].content, "bbbbbbbbbb");
    assert_eq!(chunks[1].metadata.start_line, 2);
}

#[test]
fn test_each_chunk_classified_independently() {
    let policy = IndexingPolicy::new(30, 0, [".md"], Vec::<String>::new()).unwrap();
    let chunker = Chunker::new(&policy);
    let text = "# Guide\n## Install steps here\n- [ ] buy milk #home\n- [x] done\n";

    let chunks = chunker.chunk_document(&doc("notes/mixed.md", text));

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].metadata.content_type, ContentType::Documentation);
    assert!(chunks[0].metadata.tags.is_empty());
    assert_eq!(chunks[1].metadata.content_type, ContentType::TaskList);
    assert!(chunks[1].metadata.tags.contains("home"));
}

#[test]
fn test_chunks_inherit_document_timestamps() {
    let chunker = Chunker::new(&IndexingPolicy::default());
    let document = doc("notes/a.md", "hello\nworld");

    let chunks = chunker.chunk_document(&document);

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].metadata.created_at, document.created_at);
    assert_eq!(chunks[0].metadata.modified_at, document.modified_at);
    assert!(chunks[0].embedding.is_none());
}
