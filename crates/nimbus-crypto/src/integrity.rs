//! Shard and bucket-entry integrity values
//!
//! Each encrypted shard is identified on the wire by RIPEMD-160 over its
//! SHA-256 digest (the address storage nodes are challenged on). The bucket
//! entry carries one HMAC-SHA512 over all shard hashes in index order, keyed
//! by the file key, so a client can detect shard substitution after download.

use crate::hash::{ripemd160, sha256, HmacSha512};
use crate::keys::FileKey;
use hmac::Mac;

/// Shard hash: RIPEMD-160 of the SHA-256 of the encrypted shard bytes.
pub fn shard_hash(encrypted_shard: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(encrypted_shard))
}

/// Bucket-entry HMAC over a file's shard hashes.
///
/// Shards may arrive out of order from concurrent uploads; they are sorted by
/// index before digesting so the value is stable.
pub fn file_hmac(file_key: &FileKey, shards: &[(u32, [u8; 20])]) -> [u8; 64] {
    let mut ordered: Vec<&(u32, [u8; 20])> = shards.iter().collect();
    ordered.sort_by_key(|(index, _)| *index);

    let mut mac =
        HmacSha512::new_from_slice(file_key.as_bytes()).expect("HMAC accepts keys of any length");
    for (_, hash) in ordered {
        mac.update(hash);
    }
    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hmac_sha512;
    use crate::KEY_SIZE;

    fn test_file_key() -> FileKey {
        FileKey::from_bytes([0x11; KEY_SIZE])
    }

    #[test]
    fn test_shard_hash_matches_composition() {
        let data = b"encrypted shard bytes";
        assert_eq!(shard_hash(data), ripemd160(&sha256(data)));
    }

    #[test]
    fn test_file_hmac_ignores_submission_order() {
        let key = test_file_key();
        let a = (0u32, [0xAA; 20]);
        let b = (1u32, [0xBB; 20]);
        let c = (2u32, [0xCC; 20]);

        assert_eq!(file_hmac(&key, &[a, b, c]), file_hmac(&key, &[c, a, b]));
    }

    #[test]
    fn test_file_hmac_detects_substitution() {
        let key = test_file_key();
        let original = file_hmac(&key, &[(0, [0xAA; 20]), (1, [0xBB; 20])]);
        let swapped = file_hmac(&key, &[(0, [0xBB; 20]), (1, [0xAA; 20])]);
        assert_ne!(original, swapped);
    }

    #[test]
    fn test_file_hmac_equals_manual_chain() {
        let key = test_file_key();
        let hashes = [(0u32, [1u8; 20]), (1u32, [2u8; 20])];
        let mut joined = Vec::new();
        joined.extend_from_slice(&[1u8; 20]);
        joined.extend_from_slice(&[2u8; 20]);
        assert_eq!(
            file_hmac(&key, &hashes),
            hmac_sha512(key.as_bytes(), &[&joined])
        );
    }
}
