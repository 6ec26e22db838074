//! AES-256-GCM metadata envelopes
//!
//! Envelope format (binary, base64 on the wire):
//! ```text
//! [16 bytes: GCM tag][32 bytes: IV][N bytes: ciphertext]
//! ```
//!
//! The IV occupies the full 32-byte GCM nonce region; nonces other than
//! 96 bits run through GHASH to form the counter block, exactly as Node's
//! `createCipheriv` handles them. Callers derive the IV themselves; for
//! filenames it comes deterministically from the plaintext so equal names
//! produce equal envelopes.

use aes::Aes256;
use aes_gcm::aead::generic_array::typenum::U32;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::{AeadInPlace, AesGcm, KeyInit};
use base64::prelude::{Engine as _, BASE64_STANDARD};
use nimbus_core::{NimbusError, NimbusResult};

use crate::{KEY_SIZE, META_IV_SIZE, META_TAG_SIZE};

/// AES-256-GCM with the envelope's 32-byte nonce region.
type MetaCipher = AesGcm<Aes256, U32>;

/// Encrypt a short metadata blob into a base64 envelope.
pub fn encrypt_meta(
    plaintext: &[u8],
    key: &[u8; KEY_SIZE],
    iv: &[u8; META_IV_SIZE],
) -> NimbusResult<String> {
    Ok(BASE64_STANDARD.encode(encrypt_meta_raw(plaintext, key, iv)?))
}

/// Encrypt a short metadata blob into a raw binary envelope.
pub fn encrypt_meta_raw(
    plaintext: &[u8],
    key: &[u8; KEY_SIZE],
    iv: &[u8; META_IV_SIZE],
) -> NimbusResult<Vec<u8>> {
    let cipher = MetaCipher::new(key.into());
    let nonce = GenericArray::from_slice(iv);

    let mut buf = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(nonce, b"", &mut buf)
        .map_err(|_| NimbusError::Cipher)?;

    let mut envelope = Vec::with_capacity(META_TAG_SIZE + META_IV_SIZE + buf.len());
    envelope.extend_from_slice(&tag);
    envelope.extend_from_slice(iv);
    envelope.extend_from_slice(&buf);
    Ok(envelope)
}

/// Decrypt a raw binary envelope, verifying the GCM tag.
///
/// The IV is read from the envelope itself. Tag mismatch is an error here;
/// callers for which failed authentication is an expected outcome (filename
/// lookups) fold it into an absent value instead.
pub fn decrypt_meta(key: &[u8; KEY_SIZE], envelope: &[u8]) -> NimbusResult<Vec<u8>> {
    let min = META_TAG_SIZE + META_IV_SIZE;
    if envelope.len() < min {
        return Err(NimbusError::TruncatedEnvelope {
            len: envelope.len(),
            min,
        });
    }

    let (tag, rest) = envelope.split_at(META_TAG_SIZE);
    let (iv, ciphertext) = rest.split_at(META_IV_SIZE);

    let cipher = MetaCipher::new(key.into());
    let mut buf = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(iv),
            b"",
            &mut buf,
            GenericArray::from_slice(tag),
        )
        .map_err(|_| NimbusError::Authentication)?;
    Ok(buf)
}

/// Decrypt a base64 envelope, verifying the GCM tag.
pub fn decrypt_meta_b64(key: &[u8; KEY_SIZE], envelope: &str) -> NimbusResult<Vec<u8>> {
    let raw = BASE64_STANDARD.decode(envelope)?;
    decrypt_meta(key, &raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KEY: [u8; KEY_SIZE] = [0x42; KEY_SIZE];
    const IV: [u8; META_IV_SIZE] = [0x17; META_IV_SIZE];

    #[test]
    fn test_roundtrip() {
        let envelope = encrypt_meta(b"january-report.pdf", &KEY, &IV).unwrap();
        let plaintext = decrypt_meta_b64(&KEY, &envelope).unwrap();
        assert_eq!(plaintext, b"january-report.pdf");
    }

    #[test]
    fn test_envelope_layout() {
        let envelope = encrypt_meta_raw(b"abc", &KEY, &IV).unwrap();
        assert_eq!(envelope.len(), META_TAG_SIZE + META_IV_SIZE + 3);
        assert_eq!(&envelope[META_TAG_SIZE..META_TAG_SIZE + META_IV_SIZE], &IV);
    }

    #[test]
    fn test_deterministic_under_fixed_iv() {
        let a = encrypt_meta_raw(b"same", &KEY, &IV).unwrap();
        let b = encrypt_meta_raw(b"same", &KEY, &IV).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let mut envelope = encrypt_meta_raw(b"metadata", &KEY, &IV).unwrap();
        let last = envelope.len() - 1;
        envelope[last] ^= 0x01;
        assert!(matches!(
            decrypt_meta(&KEY, &envelope),
            Err(NimbusError::Authentication)
        ));
    }

    #[test]
    fn test_tampered_tag_fails() {
        let mut envelope = encrypt_meta_raw(b"metadata", &KEY, &IV).unwrap();
        envelope[0] ^= 0x01;
        assert!(matches!(
            decrypt_meta(&KEY, &envelope),
            Err(NimbusError::Authentication)
        ));
    }

    #[test]
    fn test_truncated_envelope() {
        let result = decrypt_meta(&KEY, &[0u8; META_TAG_SIZE + META_IV_SIZE - 1]);
        assert!(matches!(
            result,
            Err(NimbusError::TruncatedEnvelope { len: 47, min: 48 })
        ));
    }

    #[test]
    fn test_wrong_key_fails() {
        let envelope = encrypt_meta_raw(b"metadata", &KEY, &IV).unwrap();
        let other = [0x43u8; KEY_SIZE];
        assert!(decrypt_meta(&other, &envelope).is_err());
    }

    proptest! {
        #[test]
        fn prop_roundtrip(
            plaintext in proptest::collection::vec(any::<u8>(), 0..256),
            key in any::<[u8; KEY_SIZE]>(),
            iv in any::<[u8; META_IV_SIZE]>(),
        ) {
            let envelope = encrypt_meta_raw(&plaintext, &key, &iv).unwrap();
            prop_assert_eq!(decrypt_meta(&key, &envelope).unwrap(), plaintext);
        }
    }
}
