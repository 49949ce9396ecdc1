// src/file_ops.rs
//! File-level encryption/decryption operations
//!
//! This module handles encryption and decryption with file I/O,
//! building on the streaming pipeline from `crypto::stream`.
//! Also includes the `.enc` naming convention.

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::consts::{DEFAULT_CHUNK_SIZE, ENCRYPTED_SUFFIX};
use crate::crypto::{decrypt_stream, encrypt_stream, StreamStats};
use crate::enums::Direction;
use crate::error::{CipherError, Result};
use crate::iv_ops::InitializationVector;
use crate::key_ops::KeyMaterial;
use crate::profile::CipherProfile;

/// How output files are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    pub chunk_size: usize,
    /// Stage output in a temp file next to the destination, rename on success
    pub atomic: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            atomic: false,
        }
    }
}

/// Encrypt `input_path` into `output_path`
pub fn encrypt_file<P: AsRef<Path>, Q: AsRef<Path>>(
    profile: &CipherProfile,
    key: &KeyMaterial,
    iv: &InitializationVector,
    input_path: P,
    output_path: Q,
    options: &WriteOptions,
) -> Result<StreamStats> {
    transform_file(
        profile,
        key,
        iv,
        Direction::Encrypt,
        input_path.as_ref(),
        output_path.as_ref(),
        options,
    )
}

/// Decrypt `input_path` into `output_path`
///
/// Without `atomic`, a failed padding check leaves the bytes decrypted so far
/// in `output_path`.
pub fn decrypt_file<P: AsRef<Path>, Q: AsRef<Path>>(
    profile: &CipherProfile,
    key: &KeyMaterial,
    iv: &InitializationVector,
    input_path: P,
    output_path: Q,
    options: &WriteOptions,
) -> Result<StreamStats> {
    transform_file(
        profile,
        key,
        iv,
        Direction::Decrypt,
        input_path.as_ref(),
        output_path.as_ref(),
        options,
    )
}

fn transform_file(
    profile: &CipherProfile,
    key: &KeyMaterial,
    iv: &InitializationVector,
    direction: Direction,
    input_path: &Path,
    output_path: &Path,
    options: &WriteOptions,
) -> Result<StreamStats> {
    let source = File::open(input_path)?;
    ensure_distinct(input_path, output_path)?;

    if options.atomic {
        let dir = parent_dir(output_path);
        let mut staged = NamedTempFile::new_in(dir)?;
        let stats = {
            let mut writer = BufWriter::new(staged.as_file_mut());
            let stats = run_direction(
                profile,
                key,
                iv,
                direction,
                &source,
                &mut writer,
                options.chunk_size,
            )?;
            writer.flush()?;
            stats
        };
        staged
            .persist(output_path)
            .map_err(|e| CipherError::Io(e.error))?;
        Ok(stats)
    } else {
        let mut writer = BufWriter::new(File::create(output_path)?);
        let stats = run_direction(
            profile,
            key,
            iv,
            direction,
            &source,
            &mut writer,
            options.chunk_size,
        )?;
        writer.flush()?;
        Ok(stats)
    }
}

fn run_direction<W: Write>(
    profile: &CipherProfile,
    key: &KeyMaterial,
    iv: &InitializationVector,
    direction: Direction,
    source: &File,
    dest: W,
    chunk_size: usize,
) -> Result<StreamStats> {
    match direction {
        Direction::Encrypt => encrypt_stream(profile, key, iv, source, dest, chunk_size),
        Direction::Decrypt => decrypt_stream(profile, key, iv, source, dest, chunk_size),
    }
}

/// Writing over the input would truncate it before it is read
fn ensure_distinct(input_path: &Path, output_path: &Path) -> Result<()> {
    let Ok(output) = output_path.canonicalize() else {
        // output does not exist yet
        return Ok(());
    };
    if input_path.canonicalize()? == output {
        return Err(CipherError::InvalidFileName(format!(
            "{} is both the input and the output",
            input_path.display()
        )));
    }
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

/// `<output_dir>/<file name>.enc`
pub fn encrypted_output_path(source: &Path, output_dir: &Path) -> Result<PathBuf> {
    let name = source.file_name().ok_or_else(|| {
        CipherError::InvalidFileName(format!("{} has no file name", source.display()))
    })?;
    let mut encrypted = OsString::from(name);
    encrypted.push(ENCRYPTED_SUFFIX);
    Ok(output_dir.join(encrypted))
}

/// `<output_dir>/<file name without .enc>`
///
/// The ciphertext name must end in `.enc` and have something before it.
pub fn decrypted_output_path(ciphertext: &Path, output_dir: &Path) -> Result<PathBuf> {
    let name = ciphertext
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            CipherError::InvalidFileName(format!(
                "{} has no UTF-8 file name",
                ciphertext.display()
            ))
        })?;
    match name.strip_suffix(ENCRYPTED_SUFFIX) {
        Some(stem) if !stem.is_empty() => Ok(output_dir.join(stem)),
        _ => Err(CipherError::InvalidFileName(format!(
            "'{name}' does not end in '{ENCRYPTED_SUFFIX}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_adds_and_strips_suffix() {
        let out = Path::new("out");
        let enc = encrypted_output_path(Path::new("/data/report.pdf"), out).unwrap();
        assert_eq!(enc, Path::new("out/report.pdf.enc"));
        assert_eq!(
            decrypted_output_path(&enc, out).unwrap(),
            Path::new("out/report.pdf")
        );
    }

    #[test]
    fn output_over_input_is_rejected_and_input_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"keep me").unwrap();
        let profile = CipherProfile::new(
            crate::enums::Algorithm::Aes,
            crate::enums::Mode::Ctr,
            crate::enums::Padding::NoPadding,
        )
        .unwrap();
        let key = KeyMaterial::from_bytes(crate::enums::Algorithm::Aes, vec![1u8; 16]).unwrap();
        let iv = InitializationVector::from_bytes(vec![2u8; 16]);

        let aliased = dir.path().join(".").join("notes.txt");
        let err = encrypt_file(&profile, &key, &iv, &path, &aliased, &WriteOptions::default())
            .unwrap_err();
        assert!(matches!(err, CipherError::InvalidFileName(_)));
        assert_eq!(std::fs::read(&path).unwrap(), b"keep me");
    }

    #[test]
    fn decrypt_name_requires_suffix() {
        let out = Path::new("out");
        assert!(matches!(
            decrypted_output_path(Path::new("report.pdf"), out),
            Err(CipherError::InvalidFileName(_))
        ));
        assert!(decrypted_output_path(Path::new(".enc"), out).is_err());
    }
}
