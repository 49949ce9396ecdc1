// src/iv_ops.rs
//! Initialization vectors: generation, literal parsing, counter derivation
//!
//! The literal form is a comma-separated list of signed bytes, e.g.
//! `"12,-7,0,127,..."`, matching what is persisted for generated IVs.

use std::fmt;

use crate::consts::MAX_BLOCK_SIZE;
use crate::error::{CipherError, Result};
use crate::key_ops::fill_random;
use crate::profile::CipherProfile;

/// IV bytes; empty for modes that take no IV
#[derive(Clone, Default)]
pub struct InitializationVector {
    bytes: Vec<u8>,
    generated: bool,
}

impl InitializationVector {
    /// The value used for ECB
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            generated: false,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn generated(&self) -> bool {
        self.generated
    }

    /// Comma-joined signed bytes
    pub fn to_literal(&self) -> String {
        self.bytes
            .iter()
            .map(|&b| (b as i8).to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

// equality is by value; provenance does not matter
impl PartialEq for InitializationVector {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for InitializationVector {}

impl fmt::Debug for InitializationVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InitializationVector([{}])", self.to_literal())
    }
}

/// Generate `width` random IV bytes
pub fn generate_iv(width: usize) -> Result<InitializationVector> {
    let mut bytes = vec![0u8; width];
    fill_random(&mut bytes).map_err(|e| CipherError::Iv(format!("random generator failed: {e}")))?;
    Ok(InitializationVector {
        bytes,
        generated: true,
    })
}

/// Parse a literal that must contain exactly `width` signed-byte tokens
pub fn parse_iv_literal(literal: &str, width: usize) -> Result<InitializationVector> {
    let tokens: Vec<&str> = literal.split(',').collect();
    if tokens.len() != width {
        return Err(CipherError::Iv(format!(
            "expected {width} comma-separated bytes, found {}",
            tokens.len()
        )));
    }

    let bytes = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            token.trim().parse::<i8>().map(|v| v as u8).map_err(|_| {
                CipherError::Iv(format!(
                    "token {i} ('{}') is not a signed byte in -128..=127",
                    token.trim()
                ))
            })
        })
        .collect::<Result<Vec<u8>>>()?;

    Ok(InitializationVector::from_bytes(bytes))
}

/// Resolve the IV for a request.
///
/// ECB profiles get an empty IV and never look at `literal`.
pub fn resolve_iv(profile: &CipherProfile, literal: Option<&str>) -> Result<InitializationVector> {
    if !profile.needs_iv() {
        return Ok(InitializationVector::none());
    }
    match literal.filter(|s| !s.trim().is_empty()) {
        Some(literal) => parse_iv_literal(literal, profile.iv_width()),
        None => generate_iv(profile.iv_width()),
    }
}

/// Counter-mode IV for the block at `block_index`.
///
/// Treats `base` as an unsigned big-endian integer of its own width and adds
/// `block_index` modulo `2^(8 * width)`. Carries past the top byte are dropped.
pub fn derive_block_iv(base: &InitializationVector, block_index: u64) -> Result<InitializationVector> {
    let width = base.len();
    if width == 0 || width > MAX_BLOCK_SIZE {
        return Err(CipherError::Iv(format!(
            "cannot derive a counter from a {width}-byte IV"
        )));
    }

    let mut wide = [0u8; 16];
    wide[16 - width..].copy_from_slice(base.as_bytes());
    let mut counter = u128::from_be_bytes(wide).wrapping_add(u128::from(block_index));
    if width < 16 {
        counter &= (1u128 << (8 * width)) - 1;
    }

    let encoded = counter.to_be_bytes();
    Ok(InitializationVector::from_bytes(encoded[16 - width..].to_vec()))
}
