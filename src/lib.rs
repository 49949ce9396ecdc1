// src/lib.rs
//! file-cipher: chunked file encryption over AES / DES block modes
//!
//! Features:
//! - 34 validated {algorithm, mode, padding} profiles
//! - Key and IV resolution (supplied, or generated and handed to a sink)
//! - Bounded-memory streaming encrypt / decrypt
//! - Random-access block range decryption for counter mode
//! - secure-gate wrapped key bytes

pub mod aliases;
pub mod config;
pub mod consts;
pub mod crypto;
pub mod engine;
pub mod enums;
pub mod error;
pub mod file_ops;
pub mod iv_ops;
pub mod key_ops;
pub mod profile;
pub mod secrets;
pub mod task;
pub mod utils;

// Re-export everything users need at the crate root
pub use aliases::KeyBytes;
pub use config::load as load_config;
pub use crypto::{
    decrypt_range, decrypt_range_from, decrypt_stream, encrypt_stream, CipherContext,
    StreamStats,
};
pub use engine::{BatchEntry, BatchReport, CipherEngine, CipherOutcome, CipherRequest, RangeRequest};
pub use enums::{Algorithm, Direction, Mode, Operation, Padding};
pub use error::{CipherError, ConfigError, Result};
pub use file_ops::{decrypt_file, encrypt_file, WriteOptions};
pub use iv_ops::{derive_block_iv, generate_iv, parse_iv_literal, resolve_iv, InitializationVector};
pub use key_ops::{decode_key, generate_key, resolve_key, KeyMaterial};
pub use profile::{CipherProfile, TransformId};
pub use secrets::{FileSecretSink, GeneratedSecrets, MemorySecretSink, NullSecretSink, SecretSink};
pub use task::{FileTransferTask, TaskStatus};
