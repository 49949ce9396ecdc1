// src/crypto/context.rs
//! Incremental cipher transform: `update` any number of times, then `finalize`
//!
//! Output per `update` call need not match the input length:
//! - whole-block modes keep a partial trailing block in `pending`;
//! - padded decryption keeps the last decrypted block in `held` until
//!   `finalize`, because only then is it known to carry the padding.

use crate::crypto::mode::ModeState;
use crate::crypto::padding::{padding_bytes, unpadded_len};
use crate::crypto::primitive::BlockPrimitive;
use crate::enums::{Direction, Mode, Padding};
use crate::error::{CipherError, Result};
use crate::iv_ops::InitializationVector;
use crate::key_ops::KeyMaterial;
use crate::profile::CipherProfile;

pub struct CipherContext {
    cipher: BlockPrimitive,
    state: ModeState,
    direction: Direction,
    mode: Mode,
    padding: Padding,
    block_size: usize,
    pending: Vec<u8>,
    held: Vec<u8>,
    consumed: u64,
}

impl CipherContext {
    /// Set up a transform. The IV is only consulted when the profile's mode
    /// takes one; ECB ignores whatever is passed.
    pub fn new(
        profile: &CipherProfile,
        key: &KeyMaterial,
        iv: &InitializationVector,
        direction: Direction,
    ) -> Result<Self> {
        if key.algorithm() != profile.algorithm() {
            return Err(CipherError::KeyMaterial(format!(
                "{} key cannot be used with profile {profile}",
                key.algorithm()
            )));
        }
        let iv_bytes: &[u8] = if profile.needs_iv() {
            if iv.len() != profile.iv_width() {
                return Err(CipherError::Iv(format!(
                    "{profile} needs a {}-byte IV, got {} bytes",
                    profile.iv_width(),
                    iv.len()
                )));
            }
            iv.as_bytes()
        } else {
            &[]
        };

        let cipher = BlockPrimitive::new(key)?;
        let block_size = cipher.block_size();
        Ok(Self {
            state: ModeState::new(profile.mode(), key, iv_bytes)?,
            cipher,
            direction,
            mode: profile.mode(),
            padding: profile.padding(),
            block_size,
            pending: Vec::new(),
            held: Vec::new(),
            consumed: 0,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Feed the next piece of input and return whatever output is ready
    pub fn update(&mut self, input: &[u8]) -> Vec<u8> {
        self.consumed += input.len() as u64;

        let out = if self.mode.is_block_aligned() {
            self.pending.extend_from_slice(input);
            let ready = self.pending.len() - self.pending.len() % self.block_size;
            let mut blocks: Vec<u8> = self.pending.drain(..ready).collect();
            self.state.apply(&self.cipher, self.direction, &mut blocks);
            blocks
        } else {
            let mut buf = input.to_vec();
            self.state.apply(&self.cipher, self.direction, &mut buf);
            buf
        };

        self.release(out)
    }

    /// Flush buffered bytes and apply (encrypt) or verify and strip
    /// (decrypt) the padding. Consumes the context.
    pub fn finalize(mut self) -> Result<Vec<u8>> {
        match self.direction {
            Direction::Encrypt => {
                if self.padding.is_padded() {
                    let pad = padding_bytes(self.padding, self.block_size, self.consumed);
                    return Ok(self.update(&pad));
                }
                if !self.pending.is_empty() {
                    return Err(CipherError::Configuration(format!(
                        "{}-byte input is not a multiple of the {}-byte block",
                        self.consumed, self.block_size
                    )));
                }
                Ok(Vec::new())
            }
            Direction::Decrypt => {
                let misaligned = self.consumed % self.block_size as u64 != 0;
                if !self.pending.is_empty() || (self.padding.is_padded() && misaligned) {
                    return Err(CipherError::DecryptionFailed(format!(
                        "{}-byte ciphertext is not a multiple of the {}-byte block",
                        self.consumed, self.block_size
                    )));
                }
                // no input carries no padding block
                if !self.padding.is_padded() || self.consumed == 0 {
                    return Ok(Vec::new());
                }
                if self.held.len() != self.block_size {
                    return Err(CipherError::DecryptionFailed(
                        "ciphertext too short to carry padding".into(),
                    ));
                }
                let keep = unpadded_len(self.padding, &self.held)?;
                self.held.truncate(keep);
                Ok(std::mem::take(&mut self.held))
            }
        }
    }

    fn release(&mut self, out: Vec<u8>) -> Vec<u8> {
        if self.direction == Direction::Encrypt || !self.padding.is_padded() {
            return out;
        }
        self.held.extend_from_slice(&out);
        if self.held.len() <= self.block_size {
            return Vec::new();
        }
        let emit = self.held.len() - self.block_size;
        self.held.drain(..emit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Algorithm;

    fn context(mode: Mode, padding: Padding, direction: Direction) -> CipherContext {
        let profile = CipherProfile::new(Algorithm::Aes, mode, padding).unwrap();
        let key = KeyMaterial::from_bytes(Algorithm::Aes, vec![7u8; 16]).unwrap();
        let iv = InitializationVector::from_bytes(vec![9u8; 16]);
        CipherContext::new(&profile, &key, &iv, direction).unwrap()
    }

    #[test]
    fn cbc_buffers_sub_block_updates() {
        let mut ctx = context(Mode::Cbc, Padding::Pkcs5, Direction::Encrypt);
        assert!(ctx.update(&[1u8; 5]).is_empty());
        assert!(ctx.update(&[1u8; 10]).is_empty());
        assert_eq!(ctx.update(&[1u8; 3]).len(), 16);
        assert_eq!(ctx.finalize().unwrap().len(), 16);
    }

    #[test]
    fn padded_decrypt_holds_back_last_block() {
        let mut enc = context(Mode::Cfb, Padding::Pkcs5, Direction::Encrypt);
        let mut ct = enc.update(b"twenty bytes of text");
        ct.extend(enc.finalize().unwrap());
        assert_eq!(ct.len(), 32);

        let mut dec = context(Mode::Cfb, Padding::Pkcs5, Direction::Decrypt);
        let first = dec.update(&ct);
        assert_eq!(first.len(), 16);
        let rest = dec.finalize().unwrap();
        assert_eq!([first, rest].concat(), b"twenty bytes of text");
    }

    #[test]
    fn truncated_cbc_ciphertext_fails() {
        let mut dec = context(Mode::Cbc, Padding::Pkcs5, Direction::Decrypt);
        dec.update(&[0u8; 20]);
        assert!(matches!(
            dec.finalize(),
            Err(CipherError::DecryptionFailed(_))
        ));
    }

    #[test]
    fn empty_padded_ciphertext_decrypts_to_nothing() {
        let dec = context(Mode::Cbc, Padding::Pkcs5, Direction::Decrypt);
        assert!(dec.finalize().unwrap().is_empty());
    }

    #[test]
    fn mismatched_key_algorithm_is_rejected() {
        let profile = CipherProfile::new(Algorithm::Des, Mode::Ctr, Padding::NoPadding).unwrap();
        let key = KeyMaterial::from_bytes(Algorithm::Aes, vec![0u8; 16]).unwrap();
        let iv = InitializationVector::from_bytes(vec![0u8; 8]);
        assert!(matches!(
            CipherContext::new(&profile, &key, &iv, Direction::Encrypt),
            Err(CipherError::KeyMaterial(_))
        ));
    }
}
