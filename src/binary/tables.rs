// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The three tables behind the header.
//!
//! Vocabulary and video entries are variable length and packed back to back,
//! so they are walked once at load time: `u32` field, `u8` length, then that
//! many bytes. The term offset table is fixed 8-byte records indexed by term
//! id, so it stays in the mapping and is decoded on demand.

use serde::Serialize;

use super::encoding::{trim_nul, ByteReader};
use super::error::FormatError;
use super::header::{IndexHeader, ENTRY_PREFIX_SIZE, TERM_OFFSET_SIZE};

/// Term identifier, dense in `[0, term_count)`.
pub type TermId = u32;

/// Entries are at least 5 bytes, so a corrupt count can't force a huge
/// allocation before the walk fails.
fn capacity_hint(r: &ByteReader<'_>, count: u32) -> usize {
    (count as usize).min(r.remaining() / ENTRY_PREFIX_SIZE)
}

// ============================================================================
// VOCABULARY TABLE
// ============================================================================

/// One decoded vocabulary entry, borrowing its word from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabEntry<'a> {
    pub term_id: TermId,
    pub word: &'a [u8],
}

/// Walk `vocab_count` entries starting at `vocab_table_offset`.
///
/// The indexer stores words with a trailing NUL counted in the length; it is
/// not part of the word and gets stripped.
pub fn decode_vocabulary<'a>(
    bytes: &'a [u8],
    header: &IndexHeader,
) -> Result<Vec<VocabEntry<'a>>, FormatError> {
    let mut r = ByteReader::at(bytes, header.vocab_table_offset as usize);
    let mut entries = Vec::with_capacity(capacity_hint(&r, header.vocab_count));

    for entry in 0..header.vocab_count {
        let term_id = r.read_u32_le()?;
        let word = trim_nul(r.read_str8()?);
        if term_id >= header.term_count {
            return Err(FormatError::TermIdOutOfRange {
                entry,
                term_id,
                term_count: header.term_count,
            });
        }
        entries.push(VocabEntry { term_id, word });
    }

    Ok(entries)
}

// ============================================================================
// TERM OFFSET TABLE
// ============================================================================

/// Where a term's posting stream starts and how many postings it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TermOffset {
    pub offset: u32,
    pub count: u32,
}

/// Zero-copy view over the term offset table.
///
/// Records are decoded from little-endian bytes on access, so the view does
/// not care about the alignment of the backing buffer.
#[derive(Debug, Clone, Copy)]
pub struct TermTable<'a> {
    bytes: &'a [u8],
}

impl<'a> TermTable<'a> {
    /// View the table described by `header`. The header must already be
    /// validated against `bytes`.
    pub fn new(bytes: &'a [u8], header: &IndexHeader) -> Result<Self, FormatError> {
        let start = header.term_table_offset as usize;
        let len = header.term_count as usize * TERM_OFFSET_SIZE;
        let table = ByteReader::at(bytes, start).read_bytes(len)?;
        Ok(Self { bytes: table })
    }

    /// View over bytes that are exactly the table records.
    pub fn from_records(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Where the table sits in the file described by `header`.
    pub fn byte_range(&self, header: &IndexHeader) -> std::ops::Range<usize> {
        let start = header.term_table_offset as usize;
        start..start + self.bytes.len()
    }

    pub fn len(&self) -> usize {
        self.bytes.len() / TERM_OFFSET_SIZE
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn get(&self, term_id: TermId) -> Option<TermOffset> {
        let start = (term_id as usize).checked_mul(TERM_OFFSET_SIZE)?;
        let record = self.bytes.get(start..start + TERM_OFFSET_SIZE)?;
        let (offset, count) = record.split_at(4);
        Some(TermOffset {
            offset: u32::from_le_bytes(offset.try_into().ok()?),
            count: u32::from_le_bytes(count.try_into().ok()?),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, TermOffset)> + 'a {
        let table = *self;
        (0..self.len() as TermId).filter_map(move |id| table.get(id).map(|t| (id, t)))
    }
}

// ============================================================================
// VIDEO TABLE
// ============================================================================

/// Video metadata: where its transcript lives and its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Video {
    pub transcript_offset: u32,
    pub name: String,
}

/// Walk `video_count` entries starting at `video_table_offset`.
pub fn decode_videos(bytes: &[u8], header: &IndexHeader) -> Result<Vec<Video>, FormatError> {
    let mut r = ByteReader::at(bytes, header.video_table_offset as usize);
    let mut videos = Vec::with_capacity(capacity_hint(&r, header.video_count));

    for _ in 0..header.video_count {
        let transcript_offset = r.read_u32_le()?;
        let name = String::from_utf8_lossy(trim_nul(r.read_str8()?)).into_owned();
        videos.push(Video {
            transcript_offset,
            name,
        });
    }

    Ok(videos)
}
