//! nimbus-crypto: client-side encryption for the Nimbus storage network
//!
//! Every key a client ever uses is derived from a single mnemonic, so any
//! device holding the mnemonic can recompute bucket and file keys without the
//! server storing secrets.
//!
//! Key hierarchy:
//! ```text
//! Mnemonic (user secret, never persisted in derived form)
//!   └── Seed (64 bytes, PBKDF2-HMAC-SHA512, 2048 rounds, salt "mnemonic")
//!         └── Bucket key (HMAC-SHA512 over the hex-decoded bucket id)
//!               ├── File key (first 32 bytes of HMAC-SHA512 chained with a per-file index)
//!               ├── Metadata key (HMAC-SHA512 with the bucket meta magic, first 32 bytes)
//!               └── Filename IV (HMAC-SHA512 over bucket id ∥ filename, first 32 bytes)
//! ```
//!
//! Metadata envelope (filenames and other short blobs):
//! `[16-byte GCM tag][32-byte IV][ciphertext]`, base64 on the wire.
//! The IV is derived from the plaintext, so identical names re-encrypt
//! identically within a bucket — the server can look entries up by ciphertext.

pub mod hash;
pub mod integrity;
pub mod kdf;
pub mod keys;
pub mod meta;
pub mod names;
pub mod stream;

pub use hash::{hmac_sha512, ripemd160, sha256, sha512, HmacSha512};
pub use integrity::{file_hmac, shard_hash};
pub use kdf::{mnemonic_to_seed, validate_mnemonic, Seed};
pub use keys::{derive_bucket_key, derive_file_key, BucketKey, FileKey};
pub use meta::{decrypt_meta, decrypt_meta_b64, encrypt_meta, encrypt_meta_raw};
pub use names::{decrypt_filename, encrypt_filename};
pub use stream::{aes256_ctr, Aes256Ctr, Aes256GcmStream};

/// Size of a symmetric content key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the PBKDF2 seed derived from the mnemonic
pub const SEED_SIZE: usize = 64;

/// Size of a bucket key (full HMAC-SHA512 output)
pub const BUCKET_KEY_SIZE: usize = 64;

/// Size of a GCM authentication tag in a metadata envelope
pub const META_TAG_SIZE: usize = 16;

/// Size of the derived IV in a metadata envelope
pub const META_IV_SIZE: usize = 32;
