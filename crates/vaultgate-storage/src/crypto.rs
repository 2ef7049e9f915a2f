//! At-rest encryption for the file store.
//!
//! AES-256-GCM with a per-value HKDF-SHA256 derived key. The master key is
//! never used directly as a cipher key; every value gets a fresh salt and
//! nonce, and the nonce is prepended to the ciphertext so a stored entry is
//! fully described by (ciphertext, salt).

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;

use crate::error::{Result, StoreError};

const NONCE_SIZE: usize = 12;
const SALT_SIZE: usize = 32;
const KEY_SIZE: usize = 32;

/// HKDF info string, domain-separating VaultGate storage keys.
const HKDF_INFO: &[u8] = b"vaultgate-storage-v1";

fn random_bytes<const N: usize>() -> [u8; N] {
    let mut buf = [0u8; N];
    rand::thread_rng().fill_bytes(&mut buf);
    buf
}

/// Derive the per-value cipher key from `master_key` and `salt`.
fn derive_key(master_key: &[u8], salt: &[u8]) -> [u8; KEY_SIZE] {
    let hk = Hkdf::<Sha256>::new(Some(salt), master_key);
    let mut okm = [0u8; KEY_SIZE];
    // expand cannot fail for a 32-byte output
    hk.expand(HKDF_INFO, &mut okm)
        .expect("HKDF expand for 32-byte output");
    okm
}

/// Encrypt `plaintext` under a key derived from `master_key`.
///
/// Returns `(nonce || ciphertext_with_tag, salt)`.
pub fn encrypt(master_key: &[u8], plaintext: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let salt: [u8; SALT_SIZE] = random_bytes();
    let nonce_bytes: [u8; NONCE_SIZE] = random_bytes();

    let key = derive_key(master_key, &salt);
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| StoreError::EncryptionFailed(e.to_string()))?;

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|e| StoreError::EncryptionFailed(e.to_string()))?;

    let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok((out, salt.to_vec()))
}

/// Decrypt data previously produced by [`encrypt`] with the same salt.
pub fn decrypt(master_key: &[u8], encrypted: &[u8], salt: &[u8]) -> Result<Vec<u8>> {
    if encrypted.len() < NONCE_SIZE {
        return Err(StoreError::DecryptionFailed(
            "ciphertext too short".to_string(),
        ));
    }
    let (nonce_bytes, ciphertext) = encrypted.split_at(NONCE_SIZE);

    let key = derive_key(master_key, salt);
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| StoreError::DecryptionFailed(e.to_string()))?;

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|e| StoreError::DecryptionFailed(e.to_string()))
}

/// Generate a fresh random 256-bit master key.
pub fn generate_master_key() -> Vec<u8> {
    random_bytes::<KEY_SIZE>().to_vec()
}
