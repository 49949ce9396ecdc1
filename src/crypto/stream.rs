// src/crypto/stream.rs
//! Whole-stream encryption / decryption in bounded chunks

use std::io::{ErrorKind, Read, Write};

use serde::Serialize;
use tracing::debug;

use crate::crypto::context::CipherContext;
use crate::enums::Direction;
use crate::error::Result;
use crate::iv_ops::InitializationVector;
use crate::key_ops::KeyMaterial;
use crate::profile::CipherProfile;

/// Byte counts for one pipeline run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    pub bytes_read: u64,
    pub bytes_written: u64,
}

pub fn encrypt_stream<R, W>(
    profile: &CipherProfile,
    key: &KeyMaterial,
    iv: &InitializationVector,
    source: R,
    destination: W,
    chunk_size: usize,
) -> Result<StreamStats>
where
    R: Read,
    W: Write,
{
    run_stream(
        profile,
        key,
        iv,
        Direction::Encrypt,
        source,
        destination,
        chunk_size,
    )
}

/// Mirror of [`encrypt_stream`]. A padding check failure at the end surfaces
/// as `DecryptionFailed`; everything decrypted before it has already been
/// written to `destination`.
pub fn decrypt_stream<R, W>(
    profile: &CipherProfile,
    key: &KeyMaterial,
    iv: &InitializationVector,
    source: R,
    destination: W,
    chunk_size: usize,
) -> Result<StreamStats>
where
    R: Read,
    W: Write,
{
    run_stream(
        profile,
        key,
        iv,
        Direction::Decrypt,
        source,
        destination,
        chunk_size,
    )
}

fn run_stream<R, W>(
    profile: &CipherProfile,
    key: &KeyMaterial,
    iv: &InitializationVector,
    direction: Direction,
    mut source: R,
    mut destination: W,
    chunk_size: usize,
) -> Result<StreamStats>
where
    R: Read,
    W: Write,
{
    let mut ctx = CipherContext::new(profile, key, iv, direction)?;
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut stats = StreamStats::default();

    debug!(%profile, ?direction, chunk_size = buf.len(), "stream transform started");

    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        stats.bytes_read += n as u64;

        let out = ctx.update(&buf[..n]);
        if !out.is_empty() {
            destination.write_all(&out)?;
            stats.bytes_written += out.len() as u64;
        }
    }

    let tail = ctx.finalize()?;
    destination.write_all(&tail)?;
    stats.bytes_written += tail.len() as u64;
    destination.flush()?;

    debug!(
        bytes_read = stats.bytes_read,
        bytes_written = stats.bytes_written,
        "stream transform finished"
    );
    Ok(stats)
}
