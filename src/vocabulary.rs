// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Word → term id dictionary.
//!
//! Built once from the vocabulary table and never mutated. Keys are the raw
//! bytes stored in the file (minus the NUL padding). The indexer only stores
//! lowercased words, so [`Vocabulary::lookup`] lowercases ASCII before
//! hashing; [`Vocabulary::lookup_exact`] does not.

use std::collections::HashMap;

use crate::binary::{FormatError, TermId, VocabEntry};
use crate::utils::normalize_token;

#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    ids: HashMap<Box<[u8]>, TermId>,
    /// Reverse table indexed by term id. Ids without a word stay `None`.
    words: Vec<Option<Box<[u8]>>>,
}

impl Vocabulary {
    /// Build from decoded entries. Ids must be below `term_count`; a repeated
    /// id or word is a format error.
    pub fn from_entries(entries: &[VocabEntry<'_>], term_count: u32) -> Result<Self, FormatError> {
        let mut ids = HashMap::with_capacity(entries.len());
        let mut words: Vec<Option<Box<[u8]>>> = vec![None; term_count as usize];

        for (entry, e) in entries.iter().enumerate() {
            let slot = words
                .get_mut(e.term_id as usize)
                .ok_or(FormatError::TermIdOutOfRange {
                    entry: entry as u32,
                    term_id: e.term_id,
                    term_count,
                })?;
            let duplicate = FormatError::DuplicateTerm {
                entry: entry as u32,
                term_id: e.term_id,
            };
            if slot.is_some() {
                return Err(duplicate);
            }
            let word: Box<[u8]> = e.word.into();
            if ids.insert(word.clone(), e.term_id).is_some() {
                return Err(duplicate);
            }
            *slot = Some(word);
        }

        Ok(Self { ids, words })
    }

    /// Resolve a query word, ASCII-lowercased first.
    pub fn lookup(&self, word: impl AsRef<[u8]>) -> Option<TermId> {
        self.lookup_exact(&normalize_token(word.as_ref()))
    }

    /// Resolve bytes exactly as stored.
    #[inline]
    pub fn lookup_exact(&self, word: &[u8]) -> Option<TermId> {
        self.ids.get(word).copied()
    }

    /// The stored word for a term id.
    pub fn word(&self, term_id: TermId) -> Option<&[u8]> {
        self.words.get(term_id as usize)?.as_deref()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
