//! Property-based tests for the gold codec
//!
//! These tests verify the invariants operators rely on:
//!
//! 1. **Round-trip**: decode(encode(m)) == m for all texts
//! 2. **Key isolation**: a different secret never opens a body
//! 3. **Integrity**: any single-byte change to a body is rejected

use base64::{Engine as _, engine::general_purpose::STANDARD};
use murmur_codec::{Codec, CodecError, GoldCodec, NONCE_SIZE};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_encode_decode_roundtrip(
        text in ".{0,200}",
        secret in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let codec = GoldCodec::new(&secret);

        let encoded = codec.encode(&text).unwrap();
        prop_assert_eq!(codec.decode(&encoded).unwrap(), text);
    }

    #[test]
    fn prop_seal_is_deterministic_per_nonce(
        text in ".{0,100}",
        nonce_byte in any::<u8>(),
    ) {
        let codec = GoldCodec::new(b"shared");
        let nonce = [nonce_byte; NONCE_SIZE];

        prop_assert_eq!(codec.seal(&text, nonce), codec.seal(&text, nonce));
    }

    #[test]
    fn prop_other_secret_cannot_open(
        text in ".{0,100}",
        secret_a in prop::collection::vec(any::<u8>(), 1..32),
        secret_b in prop::collection::vec(any::<u8>(), 1..32),
    ) {
        prop_assume!(secret_a != secret_b);

        let sealed = GoldCodec::new(&secret_a).encode(&text).unwrap();
        let result = GoldCodec::new(&secret_b).decode(&sealed);

        let is_decryption_failure = matches!(result, Err(CodecError::DecryptionFailed { .. }));
        prop_assert!(is_decryption_failure);
    }

    #[test]
    fn prop_bit_flip_is_rejected(
        text in ".{0,100}",
        position in any::<prop::sample::Index>(),
        mask in 1u8..=255,
    ) {
        let codec = GoldCodec::new(b"shared");
        let sealed = codec.encode(&text).unwrap();

        let mut raw = STANDARD.decode(sealed).unwrap();
        let idx = position.index(raw.len());
        raw[idx] ^= mask;

        prop_assert!(codec.decode(&STANDARD.encode(raw)).is_err());
    }
}
