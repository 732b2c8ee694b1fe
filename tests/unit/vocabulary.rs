//! Vocabulary dictionary built from index files.

use tsodex::binary::{FormatError, VocabEntry};
use tsodex::{Index, Vocabulary};

use super::common::{patch_u32, read_u32, sample_index, IndexFixture, VOCAB_TABLE_FIELD};

#[test]
fn test_lookup_and_reverse() {
    let index = sample_index();
    let vocab = index.vocabulary();
    assert_eq!(vocab.len(), 3);
    assert_eq!(vocab.lookup("search"), Some(1));
    assert_eq!(vocab.lookup("Search"), Some(1));
    assert_eq!(vocab.lookup_exact(b"Search"), None);
    assert_eq!(vocab.word(2), Some(&b"the"[..]));
    assert_eq!(vocab.word(3), None);
    assert_eq!(vocab.lookup("missing"), None);
}

#[test]
fn test_words_without_nul_padding() {
    let bytes = IndexFixture::new()
        .without_nul()
        .video("plain")
        .term("hello", &[])
        .build();
    let index = Index::from_bytes(bytes).unwrap();
    assert_eq!(index.lookup("hello"), Some(0));
    assert_eq!(index.videos()[0].name, "plain");
}

#[test]
fn test_duplicate_word_rejected() {
    let entries = [
        VocabEntry { term_id: 0, word: b"same" },
        VocabEntry { term_id: 1, word: b"same" },
    ];
    assert_eq!(
        Vocabulary::from_entries(&entries, 2).unwrap_err(),
        FormatError::DuplicateTerm { entry: 1, term_id: 1 }
    );
}

#[test]
fn test_term_id_out_of_range_in_file() {
    let mut bytes = IndexFixture::new().term("only", &[]).build();
    let entry = read_u32(&bytes, VOCAB_TABLE_FIELD) as usize;
    patch_u32(&mut bytes, entry, 9);
    assert!(matches!(
        Index::from_bytes(bytes),
        Err(FormatError::TermIdOutOfRange { term_id: 9, .. })
    ));
}
