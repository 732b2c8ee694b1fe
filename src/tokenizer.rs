// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query tokenization.
//!
//! Queries split on the ASCII space only; runs of spaces produce no empty
//! tokens. Each token is normalized (truncated, ASCII-lowercased) and looked
//! up. Hits become primed [`TermIterator`]s in query order. Misses are
//! dropped but still counted, so callers can tell "nothing matched" from
//! "nothing typed".

use std::borrow::Cow;

use tracing::trace;

use crate::binary::{FormatError, TermId, TermIterator};
use crate::utils::normalize_token;
use crate::Index;

/// Split a query into normalized, non-empty words.
pub fn words(query: &str) -> impl Iterator<Item = Cow<'_, [u8]>> {
    query
        .as_bytes()
        .split(|&b| b == b' ')
        .filter(|w| !w.is_empty())
        .map(normalize_token)
}

/// A tokenized query: one live iterator per resolved word.
#[derive(Debug)]
pub struct TokenizedQuery<'a> {
    /// Resolved terms, left to right. Repeated words get separate iterators.
    pub terms: Vec<TermIterator<'a>>,
    /// Every non-empty word seen, resolved or not
    pub word_count: usize,
}

impl TokenizedQuery<'_> {
    pub fn term_ids(&self) -> Vec<TermId> {
        self.terms.iter().map(TermIterator::term_id).collect()
    }

    /// Words that did not resolve.
    pub fn misses(&self) -> usize {
        self.word_count - self.terms.len()
    }
}

/// Tokenize `query` against `index`.
///
/// Lookup misses are not errors. The only failure is a term whose posting
/// stream is unreadable.
pub fn tokenize<'a>(index: &'a Index, query: &str) -> Result<TokenizedQuery<'a>, FormatError> {
    let mut terms = Vec::new();
    let mut word_count = 0;

    for word in words(query) {
        word_count += 1;
        match index.vocabulary().lookup_exact(&word) {
            Some(term_id) => terms.push(index.term_iterator(term_id)?),
            None => trace!(word = %String::from_utf8_lossy(&word), "not in vocabulary"),
        }
    }

    Ok(TokenizedQuery { terms, word_count })
}
