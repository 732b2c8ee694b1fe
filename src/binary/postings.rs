// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Posting stream decoding.
//!
//! A term's postings are every place the word was spoken: which video, the
//! word position in the transcript, the timestamp range of the caption line,
//! and the byte position. Postings are sorted by (video, position) and each
//! field is stored as a varint delta from the previous posting.
//!
//! The one subtlety: when the video id delta is nonzero, the other four
//! accumulators restart from zero before the delta is applied. Positions and
//! timestamps are relative to the start of the *current* video, not the
//! previous posting. Get this wrong and every posting after the first video
//! boundary is silently off.
//!
//! ```text
//! postings:   (v0, pos 5) (v0, pos 8) (v1, pos 2)
//! deltas:     [0, 5, ..]  [0, 3, ..]  [1, 2, ..]
//!                                      ^ video changed: pos restarts at 0
//! ```
//!
//! # References
//!
//! - **Delta Encoding for Postings**: Classic Information Retrieval technique.
//!   See Zobel & Moffat (2006): "Inverted Files for Text Search Engines",
//!   ACM Computing Surveys.

use serde::Serialize;

use super::encoding::ByteReader;
use super::error::FormatError;
use super::tables::TermId;

// ============================================================================
// POSTING
// ============================================================================

/// One occurrence of a term, with absolute field values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Posting {
    pub video_id: u32,
    /// Word index within the video's transcript
    pub position: u32,
    pub ts_min: u32,
    pub ts_max: u32,
    pub byte_pos: u32,
}

impl Posting {
    /// Apply one record's deltas.
    #[inline]
    fn apply(&mut self, deltas: [u32; 5], at: usize) -> Result<(), FormatError> {
        let [video, position, ts_min, ts_max, byte_pos] = deltas;
        if video != 0 {
            *self = Posting {
                video_id: self.video_id,
                ..Posting::default()
            };
        }
        let add = |acc: u32, delta: u32| {
            acc.checked_add(delta)
                .ok_or(FormatError::PostingOverflow { offset: at })
        };
        self.video_id = add(self.video_id, video)?;
        self.position = add(self.position, position)?;
        self.ts_min = add(self.ts_min, ts_min)?;
        self.ts_max = add(self.ts_max, ts_max)?;
        self.byte_pos = add(self.byte_pos, byte_pos)?;
        Ok(())
    }
}

// ============================================================================
// CURSOR
// ============================================================================

/// Lazy decoder over one posting stream.
///
/// The cursor starts before the first posting; [`advance`](Self::advance)
/// decodes one record at a time. Reads are bounds-checked against the slice,
/// which is the whole mapped file, so a bad stream fails instead of walking
/// off the end.
#[derive(Debug, Clone)]
pub struct PostingCursor<'a> {
    reader: ByteReader<'a>,
    remaining: u32,
    current: Posting,
}

impl<'a> PostingCursor<'a> {
    /// Cursor over `count` postings starting at `offset` in `bytes`.
    pub fn new(bytes: &'a [u8], offset: usize, count: u32) -> Self {
        Self {
            reader: ByteReader::at(bytes, offset),
            remaining: count,
            current: Posting::default(),
        }
    }

    /// Decode the next posting. `Ok(false)` once the stream is exhausted,
    /// and forever after, without touching any state.
    #[inline]
    pub fn advance(&mut self) -> Result<bool, FormatError> {
        if self.remaining == 0 {
            return Ok(false);
        }

        let at = self.reader.position();
        let mut deltas = [0u32; 5];
        for delta in &mut deltas {
            *delta = self.reader.read_varint()?;
        }
        self.current.apply(deltas, at)?;
        self.remaining -= 1;
        Ok(true)
    }

    /// Fields of the most recently decoded posting (all zero before the first).
    #[inline]
    pub fn posting(&self) -> &Posting {
        &self.current
    }

    /// Postings not yet decoded.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// File offset of the next record.
    pub fn position(&self) -> usize {
        self.reader.position()
    }
}

impl Iterator for PostingCursor<'_> {
    type Item = Result<Posting, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(true) => Some(Ok(self.current)),
            Ok(false) => None,
            Err(e) => {
                // Don't keep yielding the same error
                self.remaining = 0;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining as usize))
    }
}

// ============================================================================
// TERM ITERATOR
// ============================================================================

/// A primed cursor over one term's postings.
///
/// Created through [`Index::term_iterator`](crate::Index::term_iterator),
/// which positions it on the first posting, so [`current`](Self::current) is
/// valid before the first explicit `advance`. Stateful and consumed once.
#[derive(Debug, Clone)]
pub struct TermIterator<'a> {
    term_id: TermId,
    cursor: PostingCursor<'a>,
    primed: bool,
}

impl<'a> TermIterator<'a> {
    /// Wrap a cursor and decode its first posting.
    pub fn new(term_id: TermId, mut cursor: PostingCursor<'a>) -> Result<Self, FormatError> {
        let primed = cursor.advance()?;
        Ok(Self {
            term_id,
            cursor,
            primed,
        })
    }

    pub fn term_id(&self) -> TermId {
        self.term_id
    }

    /// The posting the iterator sits on. `None` only for an empty stream.
    #[inline]
    pub fn current(&self) -> Option<&Posting> {
        self.primed.then(|| self.cursor.posting())
    }

    /// Move to the next posting; `Ok(false)` once exhausted.
    #[inline]
    pub fn advance(&mut self) -> Result<bool, FormatError> {
        self.cursor.advance()
    }

    /// Postings left after the current one.
    pub fn remaining(&self) -> u32 {
        self.cursor.remaining()
    }

    /// The current posting and up to `limit - 1` after it.
    pub fn first_postings(mut self, limit: usize) -> Result<Vec<Posting>, FormatError> {
        let mut out = Vec::with_capacity(limit.min(self.remaining() as usize + 1));
        if limit == 0 {
            return Ok(out);
        }
        if let Some(first) = self.current() {
            out.push(*first);
        }
        while out.len() < limit && self.advance()? {
            out.push(*self.cursor.posting());
        }
        Ok(out)
    }

    /// Drain the current posting and everything after it.
    pub fn collect_postings(mut self) -> Result<Vec<Posting>, FormatError> {
        let mut out = Vec::with_capacity(self.remaining() as usize + 1);
        if let Some(first) = self.current() {
            out.push(*first);
        }
        while self.advance()? {
            out.push(*self.cursor.posting());
        }
        Ok(out)
    }
}
