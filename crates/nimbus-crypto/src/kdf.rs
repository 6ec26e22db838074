//! Seed derivation: mnemonic → 64-byte PBKDF2 seed

use nimbus_core::{NimbusError, NimbusResult};
use pbkdf2::pbkdf2_hmac;
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha512;
use zeroize::Zeroize;

use crate::SEED_SIZE;

const SEED_ROUNDS: u32 = 2048;
const SEED_SALT: &[u8] = b"mnemonic";

/// The 64-byte seed at the root of the key hierarchy.
///
/// Zeroized on drop to prevent secrets lingering in memory.
#[derive(Clone)]
pub struct Seed {
    bytes: [u8; SEED_SIZE],
}

impl Seed {
    pub fn from_bytes(bytes: [u8; SEED_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; SEED_SIZE] {
        &self.bytes
    }
}

impl Drop for Seed {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Seed").field("bytes", &"[REDACTED]").finish()
    }
}

/// Derive the 64-byte seed from a mnemonic.
///
/// PBKDF2-HMAC-SHA512 with 2048 rounds and the fixed salt `"mnemonic"` — the
/// BIP-39 seed derivation with an empty passphrase, which is the only form the
/// network client uses. The mnemonic is treated as an opaque secret here;
/// wordlist validation is a separate, caller-side concern (`validate_mnemonic`).
pub fn mnemonic_to_seed(mnemonic: &SecretString) -> NimbusResult<Seed> {
    let words = mnemonic.expose_secret();
    if words.trim().is_empty() {
        return Err(NimbusError::EmptySecret("mnemonic"));
    }

    let mut seed = [0u8; SEED_SIZE];
    pbkdf2_hmac::<Sha512>(words.as_bytes(), SEED_SALT, SEED_ROUNDS, &mut seed);
    Ok(Seed::from_bytes(seed))
}

/// Check a mnemonic against the BIP-39 english wordlist and checksum.
pub fn validate_mnemonic(words: &str) -> bool {
    words.parse::<bip39::Mnemonic>().is_ok()
}
