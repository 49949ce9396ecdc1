// src/secrets.rs
//! Sinks for generated key / IV material
//!
//! When the engine generates a key or IV on the caller's behalf, the caller
//! has to be able to get it back or the ciphertext is unrecoverable. The
//! engine hands every generated pair to a `SecretSink`; which sink is used is
//! the caller's choice.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::consts::{IV_FILE_PREFIX, KEY_FILE_PREFIX, SECRET_FILE_EXTENSION};
use crate::error::Result;

const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Generated material in its persisted text forms
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GeneratedSecrets {
    /// Standard base64
    pub key_base64: Option<String>,
    /// Comma-joined signed bytes
    pub iv_literal: Option<String>,
}

impl GeneratedSecrets {
    pub fn is_empty(&self) -> bool {
        self.key_base64.is_none() && self.iv_literal.is_none()
    }
}

pub trait SecretSink {
    /// Store the material generated while encrypting `source`
    fn persist(&mut self, source: &Path, secrets: &GeneratedSecrets) -> Result<()>;
}

/// Discards everything; generated values are still in `CipherOutcome`
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSecretSink;

impl SecretSink for NullSecretSink {
    fn persist(&mut self, _source: &Path, _secrets: &GeneratedSecrets) -> Result<()> {
        Ok(())
    }
}

/// Keeps every persisted record in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySecretSink {
    records: Vec<GeneratedSecrets>,
}

impl MemorySecretSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[GeneratedSecrets] {
        &self.records
    }
}

impl SecretSink for MemorySecretSink {
    fn persist(&mut self, _source: &Path, secrets: &GeneratedSecrets) -> Result<()> {
        self.records.push(secrets.clone());
        Ok(())
    }
}

/// Writes `key-<millis>-<source name>.txt` and `iv-<millis>-<source name>.txt`
/// side files
#[derive(Debug, Clone)]
pub struct FileSecretSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl FileSecretSink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every side file written so far
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write_side_file(&mut self, prefix: &str, tag: &str, contents: &str) -> Result<()> {
        // two writes with the same tag get a numeric suffix instead of clobbering
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                format!("{prefix}{tag}.{SECRET_FILE_EXTENSION}")
            } else {
                format!("{prefix}{tag}-{attempt}.{SECRET_FILE_EXTENSION}")
            };
            let path = self.dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(contents.as_bytes())?;
                    info!(path = %path.display(), "persisted generated secret");
                    self.written.push(path);
                    return Ok(());
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free {prefix}{tag} name in {}", self.dir.display()),
        )
        .into())
    }
}

impl SecretSink for FileSecretSink {
    fn persist(&mut self, source: &Path, secrets: &GeneratedSecrets) -> Result<()> {
        if secrets.is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.dir)?;
        let stamp = Utc::now().timestamp_millis();
        let tag = match source.file_name() {
            Some(name) => format!("{stamp}-{}", name.to_string_lossy()),
            None => stamp.to_string(),
        };
        if let Some(iv) = &secrets.iv_literal {
            self.write_side_file(IV_FILE_PREFIX, &tag, iv)?;
        }
        if let Some(key) = &secrets.key_base64 {
            self.write_side_file(KEY_FILE_PREFIX, &tag, key)?;
        }
        Ok(())
    }
}
