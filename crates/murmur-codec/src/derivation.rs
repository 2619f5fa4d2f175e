//! Codec key derivation using HKDF

use hkdf::Hkdf;
use sha2::Sha256;

/// Label bound into every derived codec key
const CODEC_KEY_LABEL: &[u8] = b"murmurGoldV1";

/// Derive the 32-byte codec key from the shared room secret.
///
/// The secret is whatever the operators agreed on out of band, usually a
/// passphrase. HKDF spreads it over the full key space, so the secret itself
/// never touches the cipher.
///
/// # Security
///
/// - Deterministic: every participant with the same secret derives the same
///   key
/// - Different secrets produce unrelated keys
pub fn derive_codec_key(secret: &[u8]) -> [u8; 32] {
    let hkdf = Hkdf::<Sha256>::new(None, secret);

    let mut key = [0u8; 32];
    let Ok(()) = hkdf.expand(CODEC_KEY_LABEL, &mut key) else {
        unreachable!("32 bytes is a valid HKDF-SHA256 output length");
    };

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        let key1 = derive_codec_key(b"correct horse battery staple");
        let key2 = derive_codec_key(b"correct horse battery staple");

        assert_eq!(key1, key2, "same secret must produce same key");
    }

    #[test]
    fn different_secrets_produce_different_keys() {
        let key1 = derive_codec_key(b"secret-one");
        let key2 = derive_codec_key(b"secret-two");

        assert_ne!(key1, key2);
    }

    #[test]
    fn key_is_not_the_secret() {
        let secret = [0x42u8; 32];
        let key = derive_codec_key(&secret);

        assert_ne!(key, secret);
    }

    #[test]
    fn empty_secret_still_derives() {
        let key = derive_codec_key(b"");

        assert_ne!(key, [0u8; 32]);
    }
}
