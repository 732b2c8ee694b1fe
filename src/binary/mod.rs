// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format for TSOD transcript search indexes.
//!
//! The file is written once by the indexer and only ever read here, through
//! a read-only memory map. Tables are laid out so the reader can find them
//! straight from the header: nothing is compressed beyond varint deltas, and
//! nothing needs decoding to look up where a term's postings start.
//!
//! # Safety Considerations
//!
//! The format has no checksum. What we can check, we check:
//! - Magic, declared header size and declared file size (truncation)
//! - Every table offset lies inside the file
//! - Every read goes through a bounds-checked cursor
//! - Varints are limited to 5 bytes and 32 bits
//!
//! A corrupt posting stream is only discovered when it is iterated (or when
//! [`Index::verify`](crate::Index::verify) walks everything up front).
//!
//! # Format Overview
//!
//! All integers little-endian.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER (48 bytes)                                          │
//! │   magic: [u8; 8] = "TSOD0001"                              │
//! │   creation_ts: u64                                         │
//! │   header_size: u32, file_size: u32                         │
//! │   video_count: u32, video_table_offset: u32                │
//! │   vocab_count: u32, vocab_table_offset: u32                │
//! │   term_count: u32,  term_table_offset: u32                 │
//! ├────────────────────────────────────────────────────────────┤
//! │ VIDEO TABLE (video_count entries)                          │
//! │   transcript_offset: u32, name_len: u8, name: [u8]         │
//! ├────────────────────────────────────────────────────────────┤
//! │ POSTING STREAMS (one per term, contiguous)                 │
//! │   per posting: 5 varint deltas                             │
//! │   (video_id, position, ts_min, ts_max, byte_pos)           │
//! ├────────────────────────────────────────────────────────────┤
//! │ TERM OFFSET TABLE (term_count × 8 bytes, 4-byte aligned)   │
//! │   offset: u32, count: u32                                  │
//! ├────────────────────────────────────────────────────────────┤
//! │ VOCABULARY TABLE (vocab_count entries)                     │
//! │   term_id: u32, word_len: u8, word: [u8] (NUL-suffixed)    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The reader does not depend on this section order; it follows the offsets
//! in the header.

// Submodules
mod encoding;
mod error;
mod header;
mod postings;
mod tables;

// Re-export from submodules for public API
pub use encoding::{decode_varint, encode_varint, trim_nul, varint_len, ByteReader};
pub use error::FormatError;
pub use header::{
    IndexHeader, ENTRY_PREFIX_SIZE, HEADER_SIZE, MAGIC, MAX_NAME_LEN, MAX_VARINT_BYTES,
    TERM_OFFSET_SIZE,
};
pub use postings::{Posting, PostingCursor, TermIterator};
pub use tables::{
    decode_videos, decode_vocabulary, TermId, TermOffset, TermTable, VocabEntry, Video,
};
