// tests/support.rs
//! Fixtures shared by the integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use file_cipher::{Algorithm, CipherProfile, InitializationVector, KeyMaterial};

/// Deterministic, non-repeating-looking test payload
pub fn sample_data(len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u32).wrapping_mul(31).wrapping_add(7) as u8)
        .collect()
}

pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write fixture");
    path
}

pub fn fixed_key(algorithm: Algorithm, len: usize) -> KeyMaterial {
    let bytes = (0..len as u8).map(|b| b.wrapping_mul(13).wrapping_add(1)).collect();
    KeyMaterial::from_bytes(algorithm, bytes).expect("fixed key")
}

/// Fixed IV of the profile's width (empty for ECB)
pub fn fixed_iv(profile: &CipherProfile) -> InitializationVector {
    if !profile.needs_iv() {
        return InitializationVector::none();
    }
    InitializationVector::from_bytes((0..profile.iv_width() as u8).map(|b| 0xA0 ^ b).collect())
}

pub fn hex(text: &str) -> Vec<u8> {
    (0..text.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&text[i..i + 2], 16).expect("hex fixture"))
        .collect()
}
