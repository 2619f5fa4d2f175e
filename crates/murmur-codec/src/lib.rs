//! Murmur message codec
//!
//! Turns operator text into printable ciphertext and back. Room messages sent
//! in encrypted ("gold") or stealth mode carry the output of [`Codec::encode`]
//! as their body; only participants holding the shared room secret can
//! recover the text.
//!
//! # Key Lifecycle
//!
//! ```text
//! Shared room secret (config)
//!        │
//!        ▼
//! HKDF-SHA256 → Codec key (32 bytes)
//!        │
//!        ▼
//! XChaCha20-Poly1305 (random 24-byte nonce) → nonce ‖ ciphertext
//!        │
//!        ▼
//! base64 → message body
//! ```
//!
//! # Security
//!
//! - Every encoding uses a fresh random nonce, so equal texts never produce
//!   equal bodies.
//! - The Poly1305 tag rejects tampered or foreign bodies on decode.
//! - The derived key is zeroized when the codec is dropped.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod derivation;
mod error;
mod gold;

pub use derivation::derive_codec_key;
pub use error::CodecError;
pub use gold::{GoldCodec, MIN_ENCODED_LEN, NONCE_SIZE};

/// Reversible text transform applied to encrypted room messages.
///
/// Both directions are fallible: encoding needs entropy and a key, decoding
/// rejects anything that was not produced under the same key.
pub trait Codec: Send + Sync {
    /// Encode plaintext into a printable message body.
    fn encode(&self, plaintext: &str) -> Result<String, CodecError>;

    /// Decode a message body produced by [`Codec::encode`].
    fn decode(&self, encoded: &str) -> Result<String, CodecError>;
}
