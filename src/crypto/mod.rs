//! Symmetric encryption for legacy credential tokens
//!
//! This module provides the symmetric cipher used by the legacy token
//! scheme. Payloads are encrypted with AES-256-GCM under a key derived from
//! the shared secret; a random 96-bit nonce is prepended to the ciphertext.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};

use crate::error::CryptoError;

/// Length of the AES-GCM nonce in bytes
const NONCE_LEN: usize = 12;

/// Derive a 256-bit cipher key from the shared secret string
fn derive_key(secret: &str) -> [u8; 32] {
    Sha256::digest(secret.as_bytes()).into()
}

/// Encrypt a payload with the shared secret.
///
/// # Arguments
///
/// * `plaintext` - The data to encrypt
/// * `secret` - The shared secret the key is derived from
///
/// # Returns
///
/// The nonce followed by the ciphertext. Each call uses a fresh random
/// nonce, so encrypting the same payload twice yields different output.
///
/// # Errors
///
/// Returns `CryptoError::EncryptFailed` if the cipher rejects the input.
pub fn encrypt(plaintext: &[u8], secret: &str) -> Result<Vec<u8>, CryptoError> {
    let key = derive_key(secret);
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| CryptoError::EncryptFailed(e.to_string()))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CryptoError::EncryptFailed(e.to_string()))?;

    let mut payload = nonce_bytes.to_vec();
    payload.extend_from_slice(&ciphertext);

    Ok(payload)
}

/// Decrypt a payload produced by [`encrypt`].
///
/// # Arguments
///
/// * `payload` - The nonce-prefixed ciphertext
/// * `secret` - The shared secret the key is derived from
///
/// # Errors
///
/// Returns `CryptoError::TruncatedPayload` if the payload cannot carry a
/// nonce, or `CryptoError::DecryptFailed` when the secret is wrong or the
/// ciphertext was tampered with.
pub fn decrypt(payload: &[u8], secret: &str) -> Result<Vec<u8>, CryptoError> {
    if payload.len() < NONCE_LEN {
        return Err(CryptoError::TruncatedPayload);
    }

    let key = derive_key(secret);
    let cipher = Aes256Gcm::new_from_slice(&key)
        .map_err(|e| CryptoError::DecryptFailed(e.to_string()))?;

    let (nonce_bytes, ciphertext) = payload.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|e| CryptoError::DecryptFailed(e.to_string()))
}
