// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the closed sets of user-visible choices:
//! cipher algorithms, block modes, padding schemes and operation kinds.
//! Each tag parses case-insensitively from the text forms collaborators use
//! (`"aes"`, `"CTR"`, `"PKCS5PADDING"`, ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{AES_BLOCK_SIZE, DES_BLOCK_SIZE};
use crate::error::CipherError;

/// Supported block cipher algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Algorithm {
    #[default]
    Aes,
    Des,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Aes, Algorithm::Des];

    pub fn block_size(self) -> usize {
        match self {
            Algorithm::Aes => AES_BLOCK_SIZE,
            Algorithm::Des => DES_BLOCK_SIZE,
        }
    }

    /// Accepted key sizes in bits
    pub fn key_sizes_bits(self) -> &'static [usize] {
        match self {
            Algorithm::Aes => &[128, 192, 256],
            // 56 effective bits, stored as 8 bytes with parity
            Algorithm::Des => &[56, 64],
        }
    }

    /// Raw key length for a requested key size, if the size is accepted
    pub fn key_len_for_bits(self, bits: usize) -> Option<usize> {
        if !self.key_sizes_bits().contains(&bits) {
            return None;
        }
        match self {
            Algorithm::Aes => Some(bits / 8),
            Algorithm::Des => Some(8),
        }
    }

    /// Whether `len` raw bytes is a valid key for this algorithm
    pub fn accepts_key_len(self, len: usize) -> bool {
        self.key_sizes_bits()
            .iter()
            .any(|&bits| self.key_len_for_bits(bits) == Some(len))
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Aes => "AES",
            Algorithm::Des => "DES",
        }
    }
}

/// Block cipher modes of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Mode {
    #[default]
    Ctr,
    Ecb,
    Cbc,
    Cfb,
    Cfb8,
    Ofb,
    Ofb8,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Ctr,
        Mode::Ecb,
        Mode::Cbc,
        Mode::Cfb,
        Mode::Cfb8,
        Mode::Ofb,
        Mode::Ofb8,
    ];

    pub fn needs_iv(self) -> bool {
        self != Mode::Ecb
    }

    /// Modes that only ever consume whole blocks
    pub fn is_block_aligned(self) -> bool {
        matches!(self, Mode::Ecb | Mode::Cbc)
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Ctr => "CTR",
            Mode::Ecb => "ECB",
            Mode::Cbc => "CBC",
            Mode::Cfb => "CFB",
            Mode::Cfb8 => "CFB8",
            Mode::Ofb => "OFB",
            Mode::Ofb8 => "OFB8",
        }
    }
}

/// Padding schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Padding {
    #[default]
    Pkcs5,
    NoPadding,
    Iso10126,
}

impl Padding {
    pub const ALL: [Padding; 3] = [Padding::Pkcs5, Padding::NoPadding, Padding::Iso10126];

    pub fn is_padded(self) -> bool {
        self != Padding::NoPadding
    }

    pub fn name(self) -> &'static str {
        match self {
            Padding::Pkcs5 => "PKCS5Padding",
            Padding::NoPadding => "NoPadding",
            Padding::Iso10126 => "ISO10126Padding",
        }
    }
}

/// Direction of a cipher transform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

/// What a request asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Encrypt,
    Decrypt,
}

impl From<Operation> for Direction {
    fn from(op: Operation) -> Self {
        match op {
            Operation::Encrypt => Direction::Encrypt,
            Operation::Decrypt => Direction::Decrypt,
        }
    }
}

impl FromStr for Algorithm {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AES" => Ok(Algorithm::Aes),
            "DES" => Ok(Algorithm::Des),
            other => Err(CipherError::Configuration(format!(
                "unsupported algorithm '{other}'"
            ))),
        }
    }
}

impl FromStr for Mode {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mode::ALL
            .into_iter()
            .find(|m| m.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CipherError::Configuration(format!("unsupported mode '{}'", s.trim())))
    }
}

impl FromStr for Padding {
    type Err = CipherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PKCS5" | "PKCS5PADDING" | "PKCS7" | "PKCS7PADDING" => Ok(Padding::Pkcs5),
            "NOPADDING" | "NONE" => Ok(Padding::NoPadding),
            "ISO10126" | "ISO10126PADDING" => Ok(Padding::Iso10126),
            other => Err(CipherError::Configuration(format!(
                "unsupported padding '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Encrypt => "encrypt",
            Operation::Decrypt => "decrypt",
        })
    }
}
