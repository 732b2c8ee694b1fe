// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Utility functions for token processing.

use std::borrow::Cow;

/// Longest token kept from a query, in bytes. Longer tokens are truncated.
pub const MAX_TOKEN_LEN: usize = 100;

/// Normalize a query token the way the indexer normalized transcript words:
/// truncate to [`MAX_TOKEN_LEN`] bytes and lowercase ASCII letters.
///
/// No Unicode folding: `"É"` stays `"É"`. Borrows when nothing changes,
/// which is the common case for typed queries.
pub fn normalize_token(token: &[u8]) -> Cow<'_, [u8]> {
    let token = &token[..token.len().min(MAX_TOKEN_LEN)];
    if token.iter().any(u8::is_ascii_uppercase) {
        Cow::Owned(token.to_ascii_lowercase())
    } else {
        Cow::Borrowed(token)
    }
}
