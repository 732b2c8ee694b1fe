// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Errors raised while decoding the `TSOD0001` layout.
//!
//! Every variant names the check that failed. Header checks (magic, header
//! size, file size) refuse files that were not written by the indexer or got
//! truncated in transit. The rest come from bounds-checked reads: a table or
//! posting stream that points outside the file surfaces here instead of
//! reading garbage past the mapping.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("unexpected magic {found:?}: expected \"TSOD0001\"")]
    BadMagic { found: [u8; 8] },

    #[error("header declares size {declared}, expected {expected}")]
    HeaderSizeMismatch { declared: u32, expected: u32 },

    #[error("header declares file size {declared}, file has {actual} bytes (truncated?)")]
    FileSizeMismatch { declared: u32, actual: u64 },

    #[error("{table} table at offset {offset} ({len} bytes) exceeds file size {file_size}")]
    TableOutOfBounds {
        table: &'static str,
        offset: u64,
        len: u64,
        file_size: u64,
    },

    #[error("unexpected end of data at offset {offset}: needed {needed} more bytes")]
    UnexpectedEnd { offset: usize, needed: usize },

    #[error("truncated varint at offset {offset}")]
    TruncatedVarint { offset: usize },

    #[error("varint at offset {offset} does not fit in 32 bits")]
    VarintOverflow { offset: usize },

    #[error("vocabulary entry {entry} has term id {term_id}, term count is {term_count}")]
    TermIdOutOfRange {
        entry: u32,
        term_id: u32,
        term_count: u32,
    },

    #[error("vocabulary entry {entry} repeats term id {term_id} or its word")]
    DuplicateTerm { entry: u32, term_id: u32 },

    #[error("term {term_id} does not exist (term count is {term_count})")]
    UnknownTerm { term_id: u32, term_count: u32 },

    #[error("posting stream of term {term_id} starts at {offset}, past end of file ({file_size})")]
    PostingOutOfBounds {
        term_id: u32,
        offset: u32,
        file_size: usize,
    },

    #[error("posting accumulator overflow at offset {offset}")]
    PostingOverflow { offset: usize },
}
