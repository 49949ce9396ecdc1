// src/error.rs
//! Public error type for the entire crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CipherError {
    /// Unsupported algorithm / mode / padding combination, or a profile used
    /// where its mode does not apply.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Key material error: {0}")]
    KeyMaterial(String),

    #[error("IV error: {0}")]
    Iv(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Padding check failed or the ciphertext length is impossible for the
    /// profile. Usually a wrong key/IV or corrupted input.
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    #[error("Invalid file name: {0}")]
    InvalidFileName(String),
}

pub type Result<T> = std::result::Result<T, CipherError>;

/// Errors raised while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config: {0}")]
    Parse(#[from] toml::de::Error),
}
