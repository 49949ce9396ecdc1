// src/crypto/primitive.rs
//! Keyed block primitives from the RustCrypto `aes` / `des` crates

use aes::{Aes128, Aes192, Aes256};
use cipher::generic_array::GenericArray;
use cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use des::Des;

use crate::enums::Algorithm;
use crate::error::{CipherError, Result};
use crate::key_ops::KeyMaterial;

/// One keyed block cipher instance. Never shared between contexts.
pub(crate) enum BlockPrimitive {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
    Des(Des),
}

impl BlockPrimitive {
    pub(crate) fn new(key: &KeyMaterial) -> Result<Self> {
        let bytes = key.expose_secret();
        let invalid = |_| {
            CipherError::KeyMaterial(format!(
                "{} bytes is not a valid {} key",
                bytes.len(),
                key.algorithm()
            ))
        };
        match (key.algorithm(), bytes.len()) {
            (Algorithm::Aes, 16) => Aes128::new_from_slice(bytes)
                .map(Self::Aes128)
                .map_err(invalid),
            (Algorithm::Aes, 24) => Aes192::new_from_slice(bytes)
                .map(Self::Aes192)
                .map_err(invalid),
            (Algorithm::Aes, 32) => Aes256::new_from_slice(bytes)
                .map(Self::Aes256)
                .map_err(invalid),
            (Algorithm::Des, 8) => Des::new_from_slice(bytes).map(Self::Des).map_err(invalid),
            (algorithm, len) => Err(CipherError::KeyMaterial(format!(
                "{len} bytes is not a valid {algorithm} key"
            ))),
        }
    }

    pub(crate) fn block_size(&self) -> usize {
        match self {
            Self::Des(_) => Algorithm::Des.block_size(),
            _ => Algorithm::Aes.block_size(),
        }
    }

    /// Encrypt one block in place. `block.len()` must equal `block_size()`.
    pub(crate) fn encrypt_block(&self, block: &mut [u8]) {
        match self {
            Self::Aes128(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes192(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes256(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
            Self::Des(c) => c.encrypt_block(GenericArray::from_mut_slice(block)),
        }
    }

    /// Decrypt one block in place. `block.len()` must equal `block_size()`.
    pub(crate) fn decrypt_block(&self, block: &mut [u8]) {
        match self {
            Self::Aes128(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes192(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Aes256(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
            Self::Des(c) => c.decrypt_block(GenericArray::from_mut_slice(block)),
        }
    }
}
