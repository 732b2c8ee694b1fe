//! Structural validation of malformed files.
//!
//! Header and tables are checked at load. Posting streams are checked when
//! read, or all at once through `Index::verify`.

use std::sync::atomic::{AtomicUsize, Ordering};

use tsodex::binary::TermOffset;
use tsodex::{FormatError, Index};

use super::common::{
    patch_u32, read_u32, sample_fixture, two_term_fixture, TERM_COUNT_FIELD, TERM_TABLE_FIELD,
    VIDEO_COUNT_FIELD, VOCAB_COUNT_FIELD,
};

fn term_record(bytes: &[u8], term_id: usize) -> usize {
    read_u32(bytes, TERM_TABLE_FIELD) as usize + term_id * 8
}

// ============================================================================
// TABLE BOUNDS
// ============================================================================

#[test]
fn test_term_table_past_end() {
    let mut bytes = two_term_fixture().build();
    let len = bytes.len() as u32;
    patch_u32(&mut bytes, TERM_TABLE_FIELD, len - 4);
    assert!(matches!(
        Index::from_bytes(bytes),
        Err(FormatError::TableOutOfBounds { table: "term", .. })
    ));
}

#[test]
fn test_term_count_too_large_for_file() {
    let mut bytes = two_term_fixture().build();
    patch_u32(&mut bytes, TERM_COUNT_FIELD, 1_000_000);
    assert!(matches!(
        Index::from_bytes(bytes),
        Err(FormatError::TableOutOfBounds { table: "term", .. })
    ));
}

#[test]
fn test_vocab_count_overruns_entries() {
    let mut bytes = two_term_fixture().build();
    // Vocabulary is the last table, so extra entries run off the end
    patch_u32(&mut bytes, VOCAB_COUNT_FIELD, 200);
    assert!(matches!(
        Index::from_bytes(bytes),
        Err(FormatError::UnexpectedEnd { .. })
    ));
}

#[test]
fn test_video_count_overruns_file() {
    let mut bytes = two_term_fixture().build();
    patch_u32(&mut bytes, VIDEO_COUNT_FIELD, 10_000);
    assert!(Index::from_bytes(bytes).is_err());
}

// ============================================================================
// TERM OFFSETS
// ============================================================================

#[test]
fn test_term_table_is_indexed_by_id() {
    let index = Index::from_bytes(sample_fixture().build()).unwrap();
    let table = index.term_table();
    assert_eq!(table.len(), 3);
    assert_eq!(index.term_offset(0).map(|t| t.count), Some(3));
    assert_eq!(index.term_offset(1).map(|t| t.count), Some(1));
    assert_eq!(index.term_offset(2).map(|t| t.count), Some(2));
    assert_eq!(index.term_offset(3), None);
}

#[test]
fn test_unknown_term_id() {
    let index = Index::from_bytes(two_term_fixture().build()).unwrap();
    assert_eq!(
        index.term_iterator(2).unwrap_err(),
        FormatError::UnknownTerm {
            term_id: 2,
            term_count: 2
        }
    );
}

#[test]
fn test_posting_offset_past_end() {
    let mut bytes = two_term_fixture().build();
    let record = term_record(&bytes, 1);
    let len = bytes.len() as u32;
    patch_u32(&mut bytes, record, len);
    let index = Index::from_bytes(bytes).unwrap();

    assert_eq!(
        index.term_offset(1),
        Some(TermOffset {
            offset: len,
            count: 1
        })
    );
    assert!(matches!(
        index.term_iterator(1),
        Err(FormatError::PostingOutOfBounds { term_id: 1, .. })
    ));
}

#[test]
fn test_empty_posting_list_anywhere() {
    let mut bytes = two_term_fixture().build();
    let record = term_record(&bytes, 1);
    patch_u32(&mut bytes, record, u32::MAX);
    patch_u32(&mut bytes, record + 4, 0);
    let index = Index::from_bytes(bytes).unwrap();

    let it = index.term_iterator(1).unwrap();
    assert!(it.current().is_none());
}

// ============================================================================
// LAZY VS EAGER POSTING CHECKS
// ============================================================================

#[test]
fn test_inflated_count_fails_lazily() {
    let mut bytes = two_term_fixture().build();
    let record = term_record(&bytes, 0);
    patch_u32(&mut bytes, record + 4, 50);
    let index = Index::from_bytes(bytes).unwrap();

    // Loading and priming succeed; the error shows up once the stream has
    // decoded the tables behind it and runs off the end of the file.
    let mut it = index.term_iterator(0).unwrap();
    let mut steps = 0;
    let err = loop {
        match it.advance() {
            Ok(true) => steps += 1,
            Ok(false) => panic!("stream should not end cleanly"),
            Err(e) => break e,
        }
    };
    assert!(steps >= 1);
    assert!(
        matches!(
            err,
            FormatError::TruncatedVarint { .. } | FormatError::PostingOverflow { .. }
        ),
        "{err}"
    );

    assert!(index.verify().is_err());
}

#[test]
fn test_verify_counts_every_posting() {
    let index = Index::from_bytes(sample_fixture().build()).unwrap();
    assert_eq!(index.verify(), Ok(6));
    assert_eq!(index.stats().postings, 6);

    let seen = AtomicUsize::new(0);
    index
        .verify_with(|_| {
            seen.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
    assert_eq!(seen.load(Ordering::Relaxed), 3);
}
