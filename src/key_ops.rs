// src/key_ops.rs
//! Key generation, decoding and representation
//!
//! This module resolves the symmetric key for a request: either fresh
//! random bytes or a base64 string supplied by the caller.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::TryRngCore;

use crate::aliases::KeyBytes;
use crate::enums::Algorithm;
use crate::error::{CipherError, Result};
use crate::profile::CipherProfile;

/// Symmetric key bytes tagged with the algorithm they belong to
pub struct KeyMaterial {
    algorithm: Algorithm,
    bytes: KeyBytes,
    generated: bool,
}

impl KeyMaterial {
    /// Wrap raw key bytes, checking the length against the algorithm
    pub fn from_bytes(algorithm: Algorithm, bytes: Vec<u8>) -> Result<Self> {
        if !algorithm.accepts_key_len(bytes.len()) {
            return Err(CipherError::KeyMaterial(format!(
                "{} bytes is not a valid {algorithm} key length",
                bytes.len()
            )));
        }
        Ok(Self {
            algorithm,
            bytes: KeyBytes::new(bytes),
            generated: false,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn expose_secret(&self) -> &[u8] {
        self.bytes.expose_secret().as_slice()
    }

    pub fn len(&self) -> usize {
        self.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the key was produced by `generate_key` rather than decoded
    pub fn generated(&self) -> bool {
        self.generated
    }

    /// Standard base64, the form persisted for generated keys
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.expose_secret())
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("algorithm", &self.algorithm)
            .field("len", &self.len())
            .field("generated", &self.generated)
            .finish_non_exhaustive()
    }
}

/// Fill `buf` from the operating system RNG
pub(crate) fn fill_random(buf: &mut [u8]) -> std::result::Result<(), String> {
    OsRng.try_fill_bytes(buf).map_err(|e| e.to_string())
}

/// Generate a fresh random key of `key_size_bits`
pub fn generate_key(algorithm: Algorithm, key_size_bits: usize) -> Result<KeyMaterial> {
    let len = algorithm.key_len_for_bits(key_size_bits).ok_or_else(|| {
        CipherError::KeyMaterial(format!(
            "{key_size_bits}-bit keys are not supported for {algorithm} (accepted: {:?})",
            algorithm.key_sizes_bits()
        ))
    })?;

    let mut bytes = vec![0u8; len];
    fill_random(&mut bytes)
        .map_err(|e| CipherError::KeyMaterial(format!("random generator failed: {e}")))?;
    if algorithm == Algorithm::Des {
        set_odd_parity(&mut bytes);
    }

    let mut key = KeyMaterial::from_bytes(algorithm, bytes)?;
    key.generated = true;
    Ok(key)
}

/// Decode a base64 key and check it matches `key_size_bits`
pub fn decode_key(
    algorithm: Algorithm,
    key_size_bits: usize,
    encoded: &str,
) -> Result<KeyMaterial> {
    let expected = algorithm.key_len_for_bits(key_size_bits).ok_or_else(|| {
        CipherError::KeyMaterial(format!(
            "{key_size_bits}-bit keys are not supported for {algorithm}"
        ))
    })?;
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| CipherError::KeyMaterial(format!("key is not valid base64: {e}")))?;
    if bytes.len() != expected {
        return Err(CipherError::KeyMaterial(format!(
            "decoded key is {} bytes, expected {expected} for {key_size_bits}-bit {algorithm}",
            bytes.len()
        )));
    }
    KeyMaterial::from_bytes(algorithm, bytes)
}

/// Resolve the key for a request: decode when given, generate otherwise
pub fn resolve_key(
    profile: &CipherProfile,
    key_size_bits: usize,
    encoded_key: Option<&str>,
) -> Result<KeyMaterial> {
    match encoded_key.map(str::trim).filter(|s| !s.is_empty()) {
        Some(encoded) => decode_key(profile.algorithm(), key_size_bits, encoded),
        None => generate_key(profile.algorithm(), key_size_bits),
    }
}

/// DES keys carry one odd-parity bit per byte
fn set_odd_parity(bytes: &mut [u8]) {
    for b in bytes.iter_mut() {
        let high = *b & 0xFE;
        *b = if high.count_ones() % 2 == 0 { high | 1 } else { high };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn des_generation_sets_odd_parity() {
        let key = generate_key(Algorithm::Des, 56).unwrap();
        assert_eq!(key.len(), 8);
        assert!(key.expose_secret().iter().all(|b| b.count_ones() % 2 == 1));
    }

    #[test]
    fn debug_does_not_print_bytes() {
        let key = KeyMaterial::from_bytes(Algorithm::Aes, vec![0xAB; 16]).unwrap();
        let text = format!("{key:?}");
        assert!(!text.contains("171"));
        assert!(!text.to_lowercase().contains("ab, "));
    }
}
