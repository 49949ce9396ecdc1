// src/crypto/range.rs
//! Random-access decryption of counter-mode ciphertext
//!
//! Block `k` of a CTR stream is the keystream for counter `iv + k`, so any
//! block range can be decrypted on its own: derive the counter, seek, and run
//! a single `update` pass. CTR carries no padding, so there is no finalize step.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::crypto::context::CipherContext;
use crate::enums::{Direction, Mode, Padding};
use crate::error::{CipherError, Result};
use crate::iv_ops::{derive_block_iv, InitializationVector};
use crate::key_ops::KeyMaterial;
use crate::profile::CipherProfile;

/// Decrypt `block_count` blocks starting at `block_index` of a CTR file.
///
/// Returns fewer bytes when the range runs past end-of-file, and an empty
/// vector when it starts at or beyond it.
pub fn decrypt_range<P: AsRef<Path>>(
    key: &KeyMaterial,
    base_iv: &InitializationVector,
    ciphertext_path: P,
    block_index: u64,
    block_count: u64,
) -> Result<Vec<u8>> {
    let mut file = File::open(ciphertext_path.as_ref())?;
    decrypt_range_from(key, base_iv, &mut file, block_index, block_count)
}

/// Same as [`decrypt_range`] over any seekable reader
pub fn decrypt_range_from<R: Read + Seek>(
    key: &KeyMaterial,
    base_iv: &InitializationVector,
    source: &mut R,
    block_index: u64,
    block_count: u64,
) -> Result<Vec<u8>> {
    let profile = CipherProfile::new(key.algorithm(), Mode::Ctr, Padding::NoPadding)?;
    let width = profile.block_width() as u64;
    if base_iv.len() as u64 != width {
        return Err(CipherError::Iv(format!(
            "counter IV must be {width} bytes for {}, got {}",
            key.algorithm(),
            base_iv.len()
        )));
    }

    let total_len = source.seek(SeekFrom::End(0))?;
    let Some(offset) = block_index.checked_mul(width) else {
        return Ok(Vec::new());
    };
    if offset >= total_len {
        return Ok(Vec::new());
    }
    let wanted = block_count.saturating_mul(width).min(total_len - offset);

    source.seek(SeekFrom::Start(offset))?;
    let mut ciphertext = Vec::new();
    source.by_ref().take(wanted).read_to_end(&mut ciphertext)?;

    let block_iv = derive_block_iv(base_iv, block_index)?;
    let mut ctx = CipherContext::new(&profile, key, &block_iv, Direction::Decrypt)?;

    debug!(block_index, block_count, offset, len = ciphertext.len(), "range decrypt");
    Ok(ctx.update(&ciphertext))
}
