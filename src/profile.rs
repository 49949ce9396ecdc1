// src/profile.rs
//! Cipher profiles: a validated {algorithm, mode, padding} triple
//!
//! A `CipherProfile` can only be built from a combination that appears in the
//! compatibility table, so nothing downstream re-checks it.

use std::fmt;

use serde::Serialize;

use crate::enums::{Algorithm, Mode, Padding};
use crate::error::{CipherError, Result};

/// Canonical transform identifier, displayed as `ALG/MODE/PADDING`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TransformId {
    pub algorithm: Algorithm,
    pub mode: Mode,
    pub padding: Padding,
}

impl fmt::Display for TransformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.algorithm, self.mode, self.padding)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CipherProfile {
    transform: TransformId,
    iv_width: usize,
}

/// Whether a mode/padding pair is supported. Identical for every algorithm.
pub fn is_supported(mode: Mode, padding: Padding) -> bool {
    match mode {
        // whole-block modes cannot carry a partial final block
        Mode::Ecb | Mode::Cbc => padding.is_padded(),
        Mode::Ctr => padding == Padding::NoPadding,
        Mode::Cfb | Mode::Cfb8 | Mode::Ofb | Mode::Ofb8 => true,
    }
}

impl CipherProfile {
    pub fn new(algorithm: Algorithm, mode: Mode, padding: Padding) -> Result<Self> {
        if !is_supported(mode, padding) {
            return Err(CipherError::Configuration(format!(
                "{algorithm}/{mode}/{padding} is not a supported combination"
            )));
        }
        let iv_width = if mode.needs_iv() {
            algorithm.block_size()
        } else {
            0
        };
        Ok(Self {
            transform: TransformId {
                algorithm,
                mode,
                padding,
            },
            iv_width,
        })
    }

    /// Build a profile from text tags such as `("AES", "CTR", "NoPadding")`
    pub fn from_names(algorithm: &str, mode: &str, padding: &str) -> Result<Self> {
        Self::new(algorithm.parse()?, mode.parse()?, padding.parse()?)
    }

    /// Every supported profile, in table order
    pub fn all() -> Vec<CipherProfile> {
        let mut out = Vec::new();
        for algorithm in Algorithm::ALL {
            for mode in Mode::ALL {
                for padding in Padding::ALL {
                    if let Ok(profile) = Self::new(algorithm, mode, padding) {
                        out.push(profile);
                    }
                }
            }
        }
        out
    }

    pub fn algorithm(&self) -> Algorithm {
        self.transform.algorithm
    }

    pub fn mode(&self) -> Mode {
        self.transform.mode
    }

    pub fn padding(&self) -> Padding {
        self.transform.padding
    }

    pub fn transform(&self) -> TransformId {
        self.transform
    }

    pub fn needs_iv(&self) -> bool {
        self.transform.mode.needs_iv()
    }

    /// IV width in bytes; zero when the mode takes no IV
    pub fn iv_width(&self) -> usize {
        self.iv_width
    }

    pub fn block_width(&self) -> usize {
        self.transform.algorithm.block_size()
    }

    pub fn is_counter_mode(&self) -> bool {
        self.transform.mode == Mode::Ctr
    }
}

impl fmt::Display for CipherProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.transform, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iv_width_tracks_mode() {
        let ecb = CipherProfile::new(Algorithm::Aes, Mode::Ecb, Padding::Pkcs5).unwrap();
        assert!(!ecb.needs_iv());
        assert_eq!(ecb.iv_width(), 0);

        let des_cbc = CipherProfile::new(Algorithm::Des, Mode::Cbc, Padding::Pkcs5).unwrap();
        assert_eq!(des_cbc.iv_width(), 8);
    }

    #[test]
    fn rejects_combinations_outside_table() {
        assert!(matches!(
            CipherProfile::new(Algorithm::Aes, Mode::Ctr, Padding::Pkcs5),
            Err(CipherError::Configuration(_))
        ));
        assert!(CipherProfile::new(Algorithm::Des, Mode::Ecb, Padding::NoPadding).is_err());
    }

    #[test]
    fn transform_id_text() {
        let p = CipherProfile::from_names("aes", "ctr", "nopadding").unwrap();
        assert_eq!(p.to_string(), "AES/CTR/NoPadding");
    }

    #[test]
    fn table_has_expected_size() {
        // per algorithm: ECB 2 + CBC 2 + CTR 1 + 4 stream modes * 3
        assert_eq!(CipherProfile::all().len(), 2 * 17);
    }
}
