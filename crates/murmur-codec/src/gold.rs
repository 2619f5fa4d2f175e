//! Gold codec: `XChaCha20-Poly1305` sealed text in base64.
//!
//! Wire layout of an encoded body, before base64:
//!
//! ```text
//! +----------------+-------------------------------+
//! | nonce (24)     | ciphertext ‖ Poly1305 tag (16) |
//! +----------------+-------------------------------+
//! ```

use std::fmt;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chacha20poly1305::{
    XChaCha20Poly1305, XNonce,
    aead::{Aead, KeyInit},
};
use zeroize::Zeroize;

use crate::{Codec, CodecError, derive_codec_key};

/// Size of the `XChaCha20` nonce prefix (24 bytes)
pub const NONCE_SIZE: usize = 24;

/// Poly1305 tag size (16 bytes)
const POLY1305_TAG_SIZE: usize = 16;

/// Smallest decoded body: nonce plus tag around an empty text.
pub const MIN_ENCODED_LEN: usize = NONCE_SIZE + POLY1305_TAG_SIZE;

/// Codec keyed from the shared room secret.
///
/// Cheap to clone; every clone holds its own copy of the derived key and
/// zeroizes it on drop.
#[derive(Clone)]
pub struct GoldCodec {
    key: [u8; 32],
}

impl GoldCodec {
    /// Create a codec from the shared room secret.
    pub fn new(secret: &[u8]) -> Self {
        Self { key: derive_codec_key(secret) }
    }

    /// Seal `plaintext` under a caller-provided nonce.
    ///
    /// [`Codec::encode`] draws the nonce from the OS RNG; this entry point
    /// exists for deterministic tests and must never reuse a nonce in
    /// production.
    pub fn seal(&self, plaintext: &str, nonce: [u8; NONCE_SIZE]) -> String {
        let cipher = XChaCha20Poly1305::new((&self.key).into());

        let Ok(ciphertext) = cipher.encrypt(XNonce::from_slice(&nonce), plaintext.as_bytes())
        else {
            unreachable!("XChaCha20-Poly1305 encryption cannot fail with valid inputs");
        };

        let mut body = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        body.extend_from_slice(&nonce);
        body.extend_from_slice(&ciphertext);
        STANDARD.encode(body)
    }

    /// Open a body produced by [`GoldCodec::seal`] or [`Codec::encode`].
    pub fn open(&self, encoded: &str) -> Result<String, CodecError> {
        let body = STANDARD
            .decode(encoded)
            .map_err(|e| CodecError::Malformed { reason: format!("invalid base64: {e}") })?;

        if body.len() < MIN_ENCODED_LEN {
            return Err(CodecError::Malformed {
                reason: format!("{} bytes is shorter than nonce and tag", body.len()),
            });
        }

        let (nonce, ciphertext) = body.split_at(NONCE_SIZE);
        let cipher = XChaCha20Poly1305::new((&self.key).into());
        let plaintext = cipher.decrypt(XNonce::from_slice(nonce), ciphertext).map_err(|_| {
            CodecError::DecryptionFailed { reason: "authentication failed".to_string() }
        })?;

        String::from_utf8(plaintext).map_err(|_| CodecError::InvalidUtf8)
    }
}

impl Codec for GoldCodec {
    fn encode(&self, plaintext: &str) -> Result<String, CodecError> {
        let mut nonce = [0u8; NONCE_SIZE];
        getrandom::fill(&mut nonce)
            .map_err(|e| CodecError::Entropy { reason: e.to_string() })?;
        Ok(self.seal(plaintext, nonce))
    }

    fn decode(&self, encoded: &str) -> Result<String, CodecError> {
        self.open(encoded)
    }
}

impl fmt::Debug for GoldCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoldCodec").field("key", &"<redacted>").finish()
    }
}

// Implement Drop to zeroize key material
impl Drop for GoldCodec {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
