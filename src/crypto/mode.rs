// src/crypto/mode.rs
//! Mode-of-operation state machines
//!
//! Whole-block modes (ECB, CBC) must be handed block-aligned buffers; the
//! context above takes care of buffering. The feedback and counter modes are
//! byte-granular and keep their position across calls, so any split of the
//! input produces the same output.

use aes::{Aes128, Aes192, Aes256};
use ctr::cipher::{KeyIvInit, StreamCipher};
use ctr::{Ctr128BE, Ctr64BE};
use des::Des;

use crate::crypto::primitive::BlockPrimitive;
use crate::enums::{Algorithm, Direction, Mode};
use crate::error::{CipherError, Result};
use crate::key_ops::KeyMaterial;
use crate::utils::xor_in_place;

/// Counter keystream with a full-block big-endian counter that wraps at the
/// block width, so `iv + k` matches `derive_block_iv`.
pub(crate) enum CounterStream {
    Aes128(Ctr128BE<Aes128>),
    Aes192(Ctr128BE<Aes192>),
    Aes256(Ctr128BE<Aes256>),
    Des(Ctr64BE<Des>),
}

impl CounterStream {
    fn new(key: &KeyMaterial, iv: &[u8]) -> Result<Self> {
        let bytes = key.expose_secret();
        let invalid = |_| {
            CipherError::KeyMaterial(format!(
                "{}-byte key / {}-byte counter is not valid for {}",
                bytes.len(),
                iv.len(),
                key.algorithm()
            ))
        };
        match (key.algorithm(), bytes.len()) {
            (Algorithm::Aes, 16) => Ctr128BE::<Aes128>::new_from_slices(bytes, iv)
                .map(Self::Aes128)
                .map_err(invalid),
            (Algorithm::Aes, 24) => Ctr128BE::<Aes192>::new_from_slices(bytes, iv)
                .map(Self::Aes192)
                .map_err(invalid),
            (Algorithm::Aes, 32) => Ctr128BE::<Aes256>::new_from_slices(bytes, iv)
                .map(Self::Aes256)
                .map_err(invalid),
            (Algorithm::Des, 8) => Ctr64BE::<Des>::new_from_slices(bytes, iv)
                .map(Self::Des)
                .map_err(invalid),
            (algorithm, len) => Err(CipherError::KeyMaterial(format!(
                "{len} bytes is not a valid {algorithm} key"
            ))),
        }
    }

    fn apply_keystream(&mut self, data: &mut [u8]) {
        match self {
            Self::Aes128(c) => c.apply_keystream(data),
            Self::Aes192(c) => c.apply_keystream(data),
            Self::Aes256(c) => c.apply_keystream(data),
            Self::Des(c) => c.apply_keystream(data),
        }
    }
}

pub(crate) enum ModeState {
    Ecb,
    Cbc {
        chain: Vec<u8>,
    },
    Ctr(CounterStream),
    Cfb {
        register: Vec<u8>,
        keystream: Vec<u8>,
        used: usize,
    },
    Cfb8 {
        register: Vec<u8>,
    },
    Ofb {
        register: Vec<u8>,
        used: usize,
    },
    Ofb8 {
        register: Vec<u8>,
    },
}

impl ModeState {
    /// `iv` must be one block wide for every mode except ECB.
    pub(crate) fn new(mode: Mode, key: &KeyMaterial, iv: &[u8]) -> Result<Self> {
        let bs = iv.len();
        Ok(match mode {
            Mode::Ecb => Self::Ecb,
            Mode::Cbc => Self::Cbc { chain: iv.to_vec() },
            Mode::Ctr => Self::Ctr(CounterStream::new(key, iv)?),
            Mode::Cfb => Self::Cfb {
                register: iv.to_vec(),
                keystream: vec![0u8; bs],
                used: bs,
            },
            Mode::Cfb8 => Self::Cfb8 {
                register: iv.to_vec(),
            },
            Mode::Ofb => Self::Ofb {
                register: iv.to_vec(),
                used: bs,
            },
            Mode::Ofb8 => Self::Ofb8 {
                register: iv.to_vec(),
            },
        })
    }

    /// Transform `data` in place
    pub(crate) fn apply(&mut self, cipher: &BlockPrimitive, direction: Direction, data: &mut [u8]) {
        let bs = cipher.block_size();
        match self {
            Self::Ecb => {
                for block in data.chunks_exact_mut(bs) {
                    match direction {
                        Direction::Encrypt => cipher.encrypt_block(block),
                        Direction::Decrypt => cipher.decrypt_block(block),
                    }
                }
            }
            Self::Cbc { chain } => {
                for block in data.chunks_exact_mut(bs) {
                    match direction {
                        Direction::Encrypt => {
                            xor_in_place(block, chain);
                            cipher.encrypt_block(block);
                            chain.copy_from_slice(block);
                        }
                        Direction::Decrypt => {
                            let saved = block.to_vec();
                            cipher.decrypt_block(block);
                            xor_in_place(block, chain);
                            chain.copy_from_slice(&saved);
                        }
                    }
                }
            }
            Self::Ctr(stream) => stream.apply_keystream(data),
            Self::Cfb {
                register,
                keystream,
                used,
            } => {
                for byte in data.iter_mut() {
                    if *used == bs {
                        keystream.copy_from_slice(register);
                        cipher.encrypt_block(keystream);
                        *used = 0;
                    }
                    let input = *byte;
                    *byte ^= keystream[*used];
                    // register collects the ciphertext block that seeds the next keystream
                    register[*used] = match direction {
                        Direction::Encrypt => *byte,
                        Direction::Decrypt => input,
                    };
                    *used += 1;
                }
            }
            Self::Cfb8 { register } => {
                let mut scratch = vec![0u8; bs];
                for byte in data.iter_mut() {
                    scratch.copy_from_slice(register);
                    cipher.encrypt_block(&mut scratch);
                    let input = *byte;
                    *byte ^= scratch[0];
                    register.rotate_left(1);
                    register[bs - 1] = match direction {
                        Direction::Encrypt => *byte,
                        Direction::Decrypt => input,
                    };
                }
            }
            Self::Ofb { register, used } => {
                for byte in data.iter_mut() {
                    if *used == bs {
                        cipher.encrypt_block(register);
                        *used = 0;
                    }
                    *byte ^= register[*used];
                    *used += 1;
                }
            }
            Self::Ofb8 { register } => {
                let mut scratch = vec![0u8; bs];
                for byte in data.iter_mut() {
                    scratch.copy_from_slice(register);
                    cipher.encrypt_block(&mut scratch);
                    *byte ^= scratch[0];
                    register.rotate_left(1);
                    register[bs - 1] = scratch[0];
                }
            }
        }
    }
}
