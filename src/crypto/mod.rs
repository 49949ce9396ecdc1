// src/crypto/mod.rs
//! Cipher core: incremental transforms, chunked streaming and range decryption
//!
//! Block primitives come from the `aes` and `des` crates. This module only
//! drives them: modes of operation, padding and I/O.

pub mod context;
pub mod range;
pub mod stream;

mod mode;
mod padding;
mod primitive;

pub use context::CipherContext;
pub use range::{decrypt_range, decrypt_range_from};
pub use stream::{decrypt_stream, encrypt_stream, StreamStats};
