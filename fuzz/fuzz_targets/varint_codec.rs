// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for varint (LEB128) decoding.
//!
//! Every posting field goes through this decoder. Garbage must come back as
//! an error, never a panic, and anything that decodes must roundtrip.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tsodex::binary::{decode_varint, encode_varint, MAX_VARINT_BYTES};

fuzz_target!(|data: &[u8]| {
    if let Ok((value, consumed)) = decode_varint(data) {
        let mut reencoded = Vec::new();
        encode_varint(value, &mut reencoded);

        let (redecoded, reconsumed) =
            decode_varint(&reencoded).expect("re-encoded value should decode");
        assert_eq!(value, redecoded, "roundtrip failed");
        assert_eq!(reconsumed, reencoded.len());

        // Non-minimal encodings (0x80 0x00) are accepted, so the input can
        // be longer than the canonical form but never past the cap.
        assert!(consumed <= MAX_VARINT_BYTES, "consumed {consumed} bytes");
        assert!(consumed <= data.len());
        assert!(reencoded.len() <= consumed);
    }
});
