// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Arbitrary query strings against a fixed index.

#![no_main]

use std::sync::LazyLock;

use libfuzzer_sys::fuzz_target;
use tsodex::testing::sample_fixture;
use tsodex::{Index, QueryExecutor};

static INDEX: LazyLock<Index> =
    LazyLock::new(|| Index::from_bytes(sample_fixture().build()).expect("fixture loads"));

fuzz_target!(|query: &str| {
    let outcome = QueryExecutor::new(&INDEX)
        .execute(query)
        .expect("fixture postings are well formed");

    let words = query.split(' ').filter(|w| !w.is_empty()).count();
    assert_eq!(outcome.word_count, words);
    assert!(outcome.term_ids.len() <= outcome.word_count);
});
