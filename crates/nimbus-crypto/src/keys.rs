//! Key hierarchy: mnemonic seed → bucket key → per-file key

use nimbus_core::NimbusResult;
use secrecy::SecretString;
use zeroize::Zeroize;

use crate::hash::hmac_sha512;
use crate::kdf::mnemonic_to_seed;
use crate::{BUCKET_KEY_SIZE, KEY_SIZE};

/// A per-bucket 64-byte key. Zeroized on drop.
#[derive(Clone)]
pub struct BucketKey {
    bytes: [u8; BUCKET_KEY_SIZE],
}

impl BucketKey {
    pub fn from_bytes(bytes: [u8; BUCKET_KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; BUCKET_KEY_SIZE] {
        &self.bytes
    }

    /// The 32-byte prefix used as HMAC key when chaining down to file keys.
    pub fn chain_prefix(&self) -> &[u8] {
        &self.bytes[..KEY_SIZE]
    }
}

impl Drop for BucketKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// A per-file 256-bit content key. Zeroized on drop.
#[derive(Clone)]
pub struct FileKey {
    bytes: [u8; KEY_SIZE],
}

impl FileKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for FileKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for FileKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive the bucket key: HMAC-SHA512 keyed by the mnemonic seed over the
/// hex-decoded bucket id.
///
/// Deterministic, so any party holding the mnemonic recomputes bucket access
/// without server-side secret storage. A bucket id that is not valid hex fails
/// with `NimbusError::InvalidHexId`; no other validation happens here.
pub fn derive_bucket_key(mnemonic: &SecretString, bucket_id: &str) -> NimbusResult<BucketKey> {
    let seed = mnemonic_to_seed(mnemonic)?;
    let id = hex::decode(bucket_id)?;
    Ok(BucketKey::from_bytes(hmac_sha512(
        seed.as_bytes(),
        &[id.as_slice()],
    )))
}

/// Derive a per-file key: the first 32 bytes of HMAC-SHA512 keyed by the
/// bucket key's 32-byte prefix over the file's index.
///
/// The index is whatever uniquely identifies the file within its bucket —
/// typically the random 32-byte content index, but any byte string works.
pub fn derive_file_key(
    mnemonic: &SecretString,
    bucket_id: &str,
    index: &[u8],
) -> NimbusResult<FileKey> {
    let bucket_key = derive_bucket_key(mnemonic, bucket_id)?;
    let digest = hmac_sha512(bucket_key.chain_prefix(), &[index]);
    let mut bytes = [0u8; KEY_SIZE];
    bytes.copy_from_slice(&digest[..KEY_SIZE]);
    Ok(FileKey::from_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_core::NimbusError;

    const TEST_MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const TEST_BUCKET: &str = "0123456789abcdef0123456789abcdef";

    fn mnemonic() -> SecretString {
        SecretString::from(TEST_MNEMONIC)
    }

    #[test]
    fn test_bucket_key_deterministic() {
        let a = derive_bucket_key(&mnemonic(), TEST_BUCKET).unwrap();
        let b = derive_bucket_key(&mnemonic(), TEST_BUCKET).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_bucket_key_varies_with_bucket() {
        let a = derive_bucket_key(&mnemonic(), TEST_BUCKET).unwrap();
        let b = derive_bucket_key(&mnemonic(), "ffffffffffffffffffffffffffffffff").unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_invalid_bucket_hex() {
        let result = derive_bucket_key(&mnemonic(), "not-hex!");
        assert!(matches!(result, Err(NimbusError::InvalidHexId(_))));
    }

    #[test]
    fn test_file_key_varies_with_index() {
        let a = derive_file_key(&mnemonic(), TEST_BUCKET, &[0u8; 32]).unwrap();
        let b = derive_file_key(&mnemonic(), TEST_BUCKET, &[1u8; 32]).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_file_key_deterministic_for_string_index() {
        let a = derive_file_key(&mnemonic(), TEST_BUCKET, b"content-id-17").unwrap();
        let b = derive_file_key(&mnemonic(), TEST_BUCKET, b"content-id-17").unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_file_key_matches_manual_chain() {
        let bucket_key = derive_bucket_key(&mnemonic(), TEST_BUCKET).unwrap();
        let digest = hmac_sha512(&bucket_key.as_bytes()[..KEY_SIZE], &[b"idx".as_slice()]);
        let file_key = derive_file_key(&mnemonic(), TEST_BUCKET, b"idx").unwrap();
        assert_eq!(&file_key.as_bytes()[..], &digest[..KEY_SIZE]);
    }
}
