//! Posting stream property tests.
//!
//! Postings are generated per video with non-decreasing fields, encoded with
//! the fixture writer, and decoded through a real index.

use proptest::prelude::*;
use tsodex::binary::Posting;
use tsodex::Index;

use super::common::{posting, IndexFixture};

/// Sorted postings: a few videos, each with a run of increasing fields.
fn postings_strategy() -> impl Strategy<Value = Vec<Posting>> {
    prop::collection::vec(
        (1u32..4, prop::collection::vec((0u32..50, 0u32..30, 0u32..5, 0u32..200), 1..8)),
        1..6,
    )
    .prop_map(|videos| {
        let mut out = Vec::new();
        let mut video_id = 0;
        for (i, (gap, steps)) in videos.into_iter().enumerate() {
            if i > 0 {
                video_id += gap;
            }
            let (mut pos, mut ts, mut ts_max, mut byte_pos) = (0u32, 0u32, 0u32, 0u32);
            for (dpos, dts, span, dbyte) in steps {
                pos += dpos;
                ts += dts;
                ts_max = ts_max.max(ts + span);
                byte_pos += dbyte;
                out.push(posting(video_id, pos, ts, ts_max, byte_pos));
            }
        }
        out
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Property: the decoder reproduces exactly what the writer encoded,
    /// across any number of video boundaries.
    #[test]
    fn prop_postings_roundtrip(postings in postings_strategy()) {
        let bytes = IndexFixture::new().term("word", &postings).build();
        let index = Index::from_bytes(bytes).unwrap();
        let decoded = index.term_iterator(0).unwrap().collect_postings().unwrap();
        prop_assert_eq!(decoded, postings);
    }

    /// Property: advance returns true exactly count - 1 times after priming,
    /// then false forever.
    #[test]
    fn prop_advance_count(postings in postings_strategy(), extra in 1usize..5) {
        let bytes = IndexFixture::new().term("word", &postings).build();
        let index = Index::from_bytes(bytes).unwrap();
        let mut it = index.term_iterator(0).unwrap();
        prop_assert!(it.current().is_some());
        for _ in 1..postings.len() {
            prop_assert_eq!(it.advance(), Ok(true));
        }
        for _ in 0..extra {
            prop_assert_eq!(it.advance(), Ok(false));
        }
        prop_assert_eq!(it.remaining(), 0);
    }

    /// Property: verify agrees with the term table totals.
    #[test]
    fn prop_verify_counts(a in postings_strategy(), b in postings_strategy()) {
        let bytes = IndexFixture::new().term("a", &a).term("b", &b).build();
        let index = Index::from_bytes(bytes).unwrap();
        prop_assert_eq!(index.verify().unwrap(), (a.len() + b.len()) as u64);
        prop_assert_eq!(index.stats().postings, (a.len() + b.len()) as u64);
    }

    /// Property: arbitrary bytes never panic the loader.
    #[test]
    fn prop_loader_total_on_garbage(mut bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        if bytes.len() >= 8 {
            bytes[..8].copy_from_slice(b"TSOD0001");
        }
        if let Ok(index) = Index::from_bytes(bytes) {
            let _ = index.verify();
        }
    }
}
