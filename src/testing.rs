// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit, integration and property tests.
//!
//! This module is always compiled but hidden from documentation. It writes
//! index files the way the indexer does: words carry a trailing NUL counted
//! in their length (video names don't), the term table is 4-byte aligned,
//! and postings are delta-encoded with the per-video reset.

#![doc(hidden)]

use std::io;
use std::path::Path;

use crate::binary::{encode_varint, IndexHeader, Posting, HEADER_SIZE, MAX_NAME_LEN};

/// Create a posting from its absolute fields.
pub fn posting(video_id: u32, position: u32, ts_min: u32, ts_max: u32, byte_pos: u32) -> Posting {
    Posting {
        video_id,
        position,
        ts_min,
        ts_max,
        byte_pos,
    }
}

/// Delta-encode a posting stream.
///
/// Postings must be sorted by (video, position) with every field
/// non-decreasing inside a video.
pub fn encode_postings(postings: &[Posting], buf: &mut Vec<u8>) {
    let mut prev = Posting::default();
    for p in postings {
        let base = if p.video_id != prev.video_id {
            Posting {
                video_id: prev.video_id,
                ..Posting::default()
            }
        } else {
            prev
        };
        for (value, from) in [
            (p.video_id, base.video_id),
            (p.position, base.position),
            (p.ts_min, base.ts_min),
            (p.ts_max, base.ts_max),
            (p.byte_pos, base.byte_pos),
        ] {
            encode_varint(value.wrapping_sub(from), buf);
        }
        prev = *p;
    }
}

/// Builder for well-formed index files.
///
/// Term ids are assigned in the order terms are added. Vocabulary entries
/// are written in reverse id order so readers can't rely on entry order.
#[derive(Debug, Clone)]
pub struct IndexFixture {
    creation_ts: u64,
    nul_terminated: bool,
    videos: Vec<String>,
    terms: Vec<(Vec<u8>, Vec<Posting>)>,
}

impl Default for IndexFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexFixture {
    pub fn new() -> Self {
        Self {
            creation_ts: 1_700_000_000,
            nul_terminated: true,
            videos: Vec::new(),
            terms: Vec::new(),
        }
    }

    pub fn created(mut self, creation_ts: u64) -> Self {
        self.creation_ts = creation_ts;
        self
    }

    /// Write words without the trailing NUL.
    pub fn without_nul(mut self) -> Self {
        self.nul_terminated = false;
        self
    }

    pub fn video(mut self, name: &str) -> Self {
        self.videos.push(name.to_string());
        self
    }

    /// Add a term with the next free id.
    pub fn term(mut self, word: &str, postings: &[Posting]) -> Self {
        self.terms.push((word.as_bytes().to_vec(), postings.to_vec()));
        self
    }

    fn push_entry(buf: &mut Vec<u8>, field: u32, text: &[u8], nul: bool) {
        let len = text.len() + usize::from(nul);
        assert!(len <= MAX_NAME_LEN, "entry too long for a u8 length: {len}");
        buf.extend_from_slice(&field.to_le_bytes());
        buf.push(len as u8);
        buf.extend_from_slice(text);
        if nul {
            buf.push(0);
        }
    }

    /// Serialize in the indexer's section order:
    /// header, videos, postings, padding, term table, vocabulary.
    pub fn build(&self) -> Vec<u8> {
        let mut body = Vec::new();

        let video_table_offset = HEADER_SIZE;
        let mut transcript_offset = 0u32;
        for name in &self.videos {
            Self::push_entry(&mut body, transcript_offset, name.as_bytes(), false);
            transcript_offset += name.len() as u32 + 1;
        }

        let mut term_table = Vec::with_capacity(self.terms.len() * 8);
        for (_, term_postings) in &self.terms {
            let offset = (HEADER_SIZE + body.len()) as u32;
            term_table.extend_from_slice(&offset.to_le_bytes());
            term_table.extend_from_slice(&(term_postings.len() as u32).to_le_bytes());
            encode_postings(term_postings, &mut body);
        }

        while (HEADER_SIZE + body.len()) % 4 != 0 {
            body.push(0);
        }
        let term_table_offset = HEADER_SIZE + body.len();
        body.extend_from_slice(&term_table);

        let vocab_table_offset = HEADER_SIZE + body.len();
        for (term_id, (word, _)) in self.terms.iter().enumerate().rev() {
            Self::push_entry(&mut body, term_id as u32, word, self.nul_terminated);
        }

        let header = IndexHeader {
            creation_ts: self.creation_ts,
            header_size: HEADER_SIZE as u32,
            file_size: (HEADER_SIZE + body.len()) as u32,
            video_count: self.videos.len() as u32,
            video_table_offset: video_table_offset as u32,
            vocab_count: self.terms.len() as u32,
            vocab_table_offset: vocab_table_offset as u32,
            term_count: self.terms.len() as u32,
            term_table_offset: term_table_offset as u32,
        };

        let mut bytes = Vec::with_capacity(HEADER_SIZE + body.len());
        header.write(&mut bytes);
        bytes.extend_from_slice(&body);
        bytes
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        std::fs::write(path, self.build())
    }
}

/// Two videos, three terms, with a video boundary inside "rust".
pub fn sample_fixture() -> IndexFixture {
    IndexFixture::new()
        .video("2023-01-05 Writing a Search Engine")
        .video("2023-02-11 Rust Borrow Checker")
        .term(
            "rust",
            &[
                posting(0, 5, 120, 124, 300),
                posting(0, 9, 130, 133, 350),
                posting(1, 2, 4, 7, 10),
            ],
        )
        .term("search", &[posting(0, 6, 120, 124, 305)])
        .term("the", &[posting(0, 1, 100, 102, 0), posting(1, 1, 0, 3, 0)])
}
