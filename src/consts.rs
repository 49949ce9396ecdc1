// src/consts.rs
//! Shared constants for I/O sizes, file naming and block geometry

/// Default read size for the streaming pipeline.
// Unrelated to the cipher block width; sub-block reads are buffered by the context.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Suffix appended to ciphertext files
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// AES block width in bytes
pub const AES_BLOCK_SIZE: usize = 16;

/// DES block width in bytes
pub const DES_BLOCK_SIZE: usize = 8;

/// Widest block any supported algorithm uses
pub const MAX_BLOCK_SIZE: usize = AES_BLOCK_SIZE;

/// File name prefix for persisted generated keys
pub const KEY_FILE_PREFIX: &str = "key-";

/// File name prefix for persisted generated IVs
pub const IV_FILE_PREFIX: &str = "iv-";

/// Extension used for persisted secret side files
pub const SECRET_FILE_EXTENSION: &str = "txt";

/// Environment variable naming an alternate config file
pub const CONFIG_ENV_VAR: &str = "FILECIPHER_CONFIG";

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "filecipher.toml";
