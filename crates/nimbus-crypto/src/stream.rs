//! Stream cipher factories for bulk file content
//!
//! Uploads encrypt shard content with AES-256-CTR; integrity rides on the
//! per-shard `shard_hash`, not on cipher tags. AES-256-GCM is for content
//! that must verify locally without a side channel.

use aes::cipher::{KeyIvInit, StreamCipher};
use aes::Aes256;
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use nimbus_core::{NimbusError, NimbusResult};

use crate::KEY_SIZE;

/// AES-256 in CTR mode with a 128-bit big-endian counter block.
pub type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Size of the CTR counter block / IV
pub const CTR_IV_SIZE: usize = 16;

/// Size of the GCM stream nonce (standard 96-bit)
pub const GCM_NONCE_SIZE: usize = 12;

/// Build an AES-256-CTR cipher bound to `(key, iv)`.
///
/// CTR is symmetric: `apply_keystream` both encrypts and decrypts. A fresh
/// cipher must be built per file; reusing one across files reuses keystream.
pub fn aes256_ctr(key: &[u8; KEY_SIZE], iv: &[u8; CTR_IV_SIZE]) -> Aes256Ctr {
    Aes256Ctr::new(key.into(), iv.into())
}

/// AES-256-GCM bound to `(key, nonce)`, sealing whole buffers.
pub struct Aes256GcmStream {
    cipher: Aes256Gcm,
    nonce: [u8; GCM_NONCE_SIZE],
}

impl Aes256GcmStream {
    pub fn new(key: &[u8; KEY_SIZE], nonce: &[u8; GCM_NONCE_SIZE]) -> Self {
        Self {
            cipher: Aes256Gcm::new(key.into()),
            nonce: *nonce,
        }
    }

    /// Encrypt, returning `ciphertext ∥ tag`.
    pub fn seal(&self, plaintext: &[u8]) -> NimbusResult<Vec<u8>> {
        self.cipher
            .encrypt(Nonce::from_slice(&self.nonce), plaintext)
            .map_err(|_| NimbusError::Cipher)
    }

    /// Decrypt `ciphertext ∥ tag`, verifying the tag.
    pub fn open(&self, sealed: &[u8]) -> NimbusResult<Vec<u8>> {
        self.cipher
            .decrypt(Nonce::from_slice(&self.nonce), sealed)
            .map_err(|_| NimbusError::Authentication)
    }
}
