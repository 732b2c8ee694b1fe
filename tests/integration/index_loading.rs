//! Opening index files from disk.
//!
//! Every startup failure must surface as its own error kind so the CLI can
//! report which check failed.

use tsodex::{FormatError, Index, IndexError};

use super::common::{
    patch_u32, posting, read_u32, two_term_fixture, write_temp, FILE_SIZE_FIELD,
    HEADER_SIZE_FIELD,
};

// ============================================================================
// HAPPY PATH
// ============================================================================

#[test]
fn test_open_two_term_one_video() {
    let file = write_temp(&two_term_fixture().build());
    let index = Index::open(file.path()).unwrap();

    assert!(index.is_mapped());
    assert_eq!(index.videos().len(), 1);
    assert_eq!(index.videos()[0].name, "2022-08-14 Porth Compiler");

    let term_id = index.lookup("stack").unwrap();
    assert_eq!(term_id, 1);
    let it = index.term_iterator(term_id).unwrap();
    assert_eq!(it.current().copied(), Some(posting(0, 8, 60, 63, 418)));
}

#[test]
fn test_mapped_and_owned_agree() {
    let bytes = two_term_fixture().build();
    let file = write_temp(&bytes);
    let mapped = Index::open(file.path()).unwrap();
    let owned = Index::from_bytes(bytes).unwrap();

    assert_eq!(mapped.header(), owned.header());
    assert_eq!(mapped.as_bytes(), owned.as_bytes());
    assert_eq!(mapped.len_bytes(), owned.len_bytes());
    let collect = |index: &Index| {
        index
            .term_iterator(0)
            .unwrap()
            .collect_postings()
            .unwrap()
    };
    assert_eq!(collect(&mapped), collect(&owned));
}

#[test]
fn test_header_creation_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tsoding.dat");
    two_term_fixture()
        .created(1_600_000_000)
        .write_to(&path)
        .unwrap();
    let index = Index::open(&path).unwrap();
    assert_eq!(index.header().creation_ts, 1_600_000_000);
    assert_eq!(
        index.header().created_at(),
        std::time::UNIX_EPOCH + std::time::Duration::from_secs(1_600_000_000)
    );
}

#[test]
fn test_indexes_are_independent() {
    let a = write_temp(&two_term_fixture().build());
    let b = write_temp(&super::common::sample_fixture().build());
    let a = Index::open(a.path()).unwrap();
    let b = Index::open(b.path()).unwrap();
    assert_eq!(a.lookup("porth"), Some(0));
    assert_eq!(b.lookup("porth"), None);
    assert_eq!(b.lookup("rust"), Some(0));
}

// ============================================================================
// STARTUP FAILURES
// ============================================================================

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Index::open(dir.path().join("tsoding.dat")).unwrap_err();
    assert!(matches!(err, IndexError::Open { .. }), "{err}");
}

#[test]
fn test_short_header_read() {
    let bytes = two_term_fixture().build();
    let file = write_temp(&bytes[..30]);
    let err = Index::open(file.path()).unwrap_err();
    assert!(matches!(err, IndexError::ShortHeader { .. }), "{err}");
}

#[test]
fn test_empty_file() {
    let file = write_temp(&[]);
    assert!(matches!(
        Index::open(file.path()),
        Err(IndexError::ShortHeader { .. })
    ));
}

#[test]
fn test_bad_magic() {
    let mut bytes = two_term_fixture().build();
    bytes[..8].copy_from_slice(b"TSOD0002");
    let file = write_temp(&bytes);
    match Index::open(file.path()) {
        Err(IndexError::Format(FormatError::BadMagic { found })) => {
            assert_eq!(&found, b"TSOD0002");
        }
        other => panic!("expected bad magic, got {other:?}"),
    }
}

#[test]
fn test_header_size_mismatch() {
    let mut bytes = two_term_fixture().build();
    patch_u32(&mut bytes, HEADER_SIZE_FIELD, 52);
    let file = write_temp(&bytes);
    assert!(matches!(
        Index::open(file.path()),
        Err(IndexError::Format(FormatError::HeaderSizeMismatch {
            declared: 52,
            expected: 48
        }))
    ));
}

#[test]
fn test_file_size_mismatch_on_truncation() {
    let bytes = two_term_fixture().build();
    let declared = read_u32(&bytes, FILE_SIZE_FIELD);
    let file = write_temp(&bytes[..bytes.len() - 3]);
    match Index::open(file.path()) {
        Err(IndexError::Format(FormatError::FileSizeMismatch { declared: d, actual })) => {
            assert_eq!(d, declared);
            assert_eq!(actual, u64::from(declared) - 3);
        }
        other => panic!("expected file size mismatch, got {other:?}"),
    }
}

#[test]
fn test_file_size_mismatch_on_trailing_bytes() {
    let mut bytes = two_term_fixture().build();
    bytes.extend_from_slice(&[0; 16]);
    let file = write_temp(&bytes);
    assert!(matches!(
        Index::open(file.path()),
        Err(IndexError::Format(FormatError::FileSizeMismatch { .. }))
    ));
}

#[test]
fn test_error_messages_name_the_file() {
    let file = write_temp(&[0; 10]);
    let message = Index::open(file.path()).unwrap_err().to_string();
    assert!(message.contains(&file.path().display().to_string()), "{message}");
}

#[test]
fn test_error_cause_is_chained_not_repeated() {
    use std::error::Error;

    let missing = std::env::temp_dir().join("tsodex-missing-index.dat");
    let err = Index::open(&missing).unwrap_err();
    let cause = err.source().map(ToString::to_string).unwrap();
    assert!(!err.to_string().contains(&cause), "{err}");

    let mut bytes = two_term_fixture().build();
    bytes.pop();
    let file = write_temp(&bytes);
    let err = Index::open(file.path()).unwrap_err();
    assert_eq!(err.to_string(), "invalid index file");
    assert!(matches!(
        err.source().and_then(|e| e.downcast_ref::<FormatError>()),
        Some(FormatError::FileSizeMismatch { .. })
    ));
}
