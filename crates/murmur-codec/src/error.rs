//! Codec error types.

use thiserror::Error;

/// Errors from encoding or decoding message bodies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The body is not valid base64 or is too short to hold a nonce and tag.
    #[error("malformed message: {reason}")]
    Malformed {
        /// What was wrong with the body
        reason: String,
    },

    /// Authentication failed: wrong key or tampered body.
    #[error("decryption failed: {reason}")]
    DecryptionFailed {
        /// Reason for decryption failure
        reason: String,
    },

    /// The decrypted bytes are not UTF-8 text.
    #[error("decrypted message is not valid UTF-8")]
    InvalidUtf8,

    /// The OS random number generator could not produce a nonce.
    #[error("entropy unavailable: {reason}")]
    Entropy {
        /// Underlying RNG failure
        reason: String,
    },
}
