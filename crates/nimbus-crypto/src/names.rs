//! Deterministic filename encryption
//!
//! The metadata key and the IV both derive from the bucket key, and the IV
//! additionally from the name itself, so the same filename always encrypts to
//! the same envelope within a bucket. The server can dedup and look entries up
//! without seeing plaintext; the cost is that equal names are visibly equal
//! under the same bucket. That trade-off is deliberate.

use nimbus_core::NimbusResult;
use secrecy::SecretString;

use crate::hash::hmac_sha512;
use crate::keys::{derive_bucket_key, BucketKey};
use crate::meta::{decrypt_meta_b64, encrypt_meta};
use crate::{KEY_SIZE, META_IV_SIZE};

/// Fixed HMAC message for deriving a bucket's metadata key. The value is
/// pinned by the storage network's wire format; changing it orphans every
/// previously written bucket entry.
pub const BUCKET_META_MAGIC: [u8; 32] = [
    66, 150, 71, 16, 50, 114, 88, 160, 163, 35, 154, 65, 162, 213, 226, 215, 70, 138, 57, 61, 52,
    19, 210, 170, 38, 164, 162, 200, 86, 233, 2, 81,
];

fn meta_key(bucket_key: &BucketKey) -> [u8; KEY_SIZE] {
    let digest = hmac_sha512(bucket_key.as_bytes(), &[&BUCKET_META_MAGIC]);
    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&digest[..KEY_SIZE]);
    key
}

fn name_iv(bucket_key: &BucketKey, bucket_id: &str, filename: &str) -> [u8; META_IV_SIZE] {
    let digest = hmac_sha512(
        bucket_key.as_bytes(),
        &[bucket_id.as_bytes(), filename.as_bytes()],
    );
    let mut iv = [0u8; META_IV_SIZE];
    iv.copy_from_slice(&digest[..META_IV_SIZE]);
    iv
}

/// Encrypt a filename for storage in a bucket entry.
///
/// Returns the base64 envelope `tag ∥ iv ∥ ciphertext`.
pub fn encrypt_filename(
    mnemonic: &SecretString,
    bucket_id: &str,
    filename: &str,
) -> NimbusResult<String> {
    let bucket_key = derive_bucket_key(mnemonic, bucket_id)?;
    let key = meta_key(&bucket_key);
    let iv = name_iv(&bucket_key, bucket_id, filename);
    encrypt_meta(filename.as_bytes(), &key, &iv)
}

/// Decrypt a filename from a bucket entry.
///
/// Derivation failures (bad bucket id hex, empty mnemonic) are errors. A
/// failed envelope — wrong key, corrupted data, tag mismatch, non-UTF-8
/// plaintext — is `Ok(None)`: undecryptable names are an expected condition
/// when listing shared or stale buckets and must not abort the listing.
pub fn decrypt_filename(
    mnemonic: &SecretString,
    bucket_id: &str,
    encrypted: &str,
) -> NimbusResult<Option<String>> {
    let bucket_key = derive_bucket_key(mnemonic, bucket_id)?;
    let key = meta_key(&bucket_key);
    match decrypt_meta_b64(&key, encrypted) {
        Ok(plaintext) => Ok(String::from_utf8(plaintext).ok()),
        Err(_) => Ok(None),
    }
}
