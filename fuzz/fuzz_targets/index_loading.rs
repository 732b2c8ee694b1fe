// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index loading under adversarial input.
//!
//! A crafted index file should at worst produce an error. The fuzzer gets a
//! valid magic and a file size that matches, so it spends its time on the
//! tables and posting streams instead of the first two header checks.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tsodex::binary::{HEADER_SIZE, MAGIC};
use tsodex::Index;

fuzz_target!(|data: &[u8]| {
    let mut bytes = data.to_vec();
    if bytes.len() >= HEADER_SIZE {
        bytes[..8].copy_from_slice(&MAGIC);
        let len = bytes.len() as u32;
        bytes[20..24].copy_from_slice(&len.to_le_bytes());
    }

    let Ok(index) = Index::from_bytes(bytes) else {
        return;
    };

    // Loaded indexes must answer every accessor without panicking
    let _ = index.stats();
    for term_id in 0..index.term_count() {
        if let Ok(it) = index.term_iterator(term_id) {
            let _ = it.collect_postings();
        }
    }
    let _ = index.verify();
    let _ = index.lookup("the");
});
