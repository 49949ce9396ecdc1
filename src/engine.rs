// src/engine.rs
//! Request/response boundary for callers
//!
//! A caller (CLI, GUI, test) builds a `CipherRequest`, hands it to a
//! `CipherEngine` and gets a `CipherOutcome` back. Each request resolves
//! profile → key → IV and then runs the whole-file pipeline. Block range
//! reads go through `RangeRequest` and the counter-mode range decryptor.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::crypto::{decrypt_range, StreamStats};
use crate::enums::Operation;
use crate::error::{CipherError, Result};
use crate::file_ops::{
    decrypt_file, decrypted_output_path, encrypt_file, encrypted_output_path, WriteOptions,
};
use crate::iv_ops::{parse_iv_literal, resolve_iv, InitializationVector};
use crate::key_ops::{decode_key, resolve_key, KeyMaterial};
use crate::profile::{CipherProfile, TransformId};
use crate::secrets::{GeneratedSecrets, NullSecretSink, SecretSink};
use crate::task::{FileTransferTask, TaskStatus};

/// One whole-file encrypt or decrypt
#[derive(Debug, Clone)]
pub struct CipherRequest {
    pub operation: Operation,
    pub profile: CipherProfile,
    pub key_size_bits: usize,
    /// Base64 key; generated when absent (encryption only)
    pub encoded_key: Option<String>,
    /// Comma-separated signed bytes; generated when absent (encryption only)
    pub iv_literal: Option<String>,
    pub source: PathBuf,
    /// Overrides the `<output dir>/<name>[.enc]` convention
    pub destination: Option<PathBuf>,
}

impl CipherRequest {
    pub fn new<P: Into<PathBuf>>(
        operation: Operation,
        profile: CipherProfile,
        key_size_bits: usize,
        source: P,
    ) -> Self {
        Self {
            operation,
            profile,
            key_size_bits,
            encoded_key: None,
            iv_literal: None,
            source: source.into(),
            destination: None,
        }
    }

    pub fn encrypt<P: Into<PathBuf>>(profile: CipherProfile, key_size_bits: usize, source: P) -> Self {
        Self::new(Operation::Encrypt, profile, key_size_bits, source)
    }

    pub fn decrypt<P: Into<PathBuf>>(profile: CipherProfile, key_size_bits: usize, source: P) -> Self {
        Self::new(Operation::Decrypt, profile, key_size_bits, source)
    }

    pub fn with_key<S: Into<String>>(mut self, encoded_key: S) -> Self {
        self.encoded_key = Some(encoded_key.into());
        self
    }

    pub fn with_iv<S: Into<String>>(mut self, iv_literal: S) -> Self {
        self.iv_literal = Some(iv_literal.into());
        self
    }

    pub fn with_destination<P: Into<PathBuf>>(mut self, destination: P) -> Self {
        self.destination = Some(destination.into());
        self
    }
}

/// Random-access read of a counter-mode ciphertext file
#[derive(Debug, Clone)]
pub struct RangeRequest {
    pub profile: CipherProfile,
    pub key_size_bits: usize,
    pub encoded_key: String,
    pub iv_literal: String,
    pub source: PathBuf,
    pub block_index: u64,
    pub block_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CipherOutcome {
    pub operation: Operation,
    pub transform: TransformId,
    pub source: PathBuf,
    pub destination: PathBuf,
    pub stats: StreamStats,
    /// Key/IV generated for this request, if any
    pub generated: GeneratedSecrets,
}

/// One row of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub task: FileTransferTask,
    pub outcome: Option<CipherOutcome>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn count(&self, status: TaskStatus) -> usize {
        self.entries
            .iter()
            .filter(|e| e.task.status() == status)
            .count()
    }

    pub fn all_finished(&self) -> bool {
        self.count(TaskStatus::Finished) == self.entries.len()
    }
}

pub struct CipherEngine<S = NullSecretSink> {
    sink: S,
    output_dir: PathBuf,
    options: WriteOptions,
    persist_generated: bool,
}

impl<S: SecretSink> CipherEngine<S> {
    pub fn new(sink: S) -> Self {
        Self::from_config(&Config::default(), sink)
    }

    pub fn from_config(config: &Config, sink: S) -> Self {
        Self {
            sink,
            output_dir: config.output_dir(),
            options: WriteOptions {
                chunk_size: config.io.chunk_size,
                atomic: config.features.atomic_writes,
            },
            persist_generated: config.secrets.persist_generated,
        }
    }

    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.options.chunk_size = chunk_size;
        self
    }

    pub fn with_atomic_writes(mut self, atomic: bool) -> Self {
        self.options.atomic = atomic;
        self
    }

    pub fn with_persist_generated(mut self, persist: bool) -> Self {
        self.persist_generated = persist;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Run a single request with a throwaway task
    pub fn execute(&mut self, request: &CipherRequest) -> Result<CipherOutcome> {
        let mut task = FileTransferTask::new(&request.source);
        self.run_task(request, &mut task)
    }

    /// Run `request`, driving `task` through its status transitions.
    ///
    /// A task that already left `Unprocessed` is not run again.
    pub fn run_task(
        &mut self,
        request: &CipherRequest,
        task: &mut FileTransferTask,
    ) -> Result<CipherOutcome> {
        if !task.begin() {
            return Err(CipherError::Configuration(format!(
                "task for {} is already {}",
                task.source().display(),
                task.status()
            )));
        }
        debug!(
            operation = %request.operation,
            profile = %request.profile,
            source = %request.source.display(),
            "task started"
        );

        let result = match request.operation {
            Operation::Encrypt => self.encrypt(request, task),
            Operation::Decrypt => self.decrypt(request, task),
        };

        match result {
            Ok(outcome) => {
                task.finish();
                info!(
                    operation = %outcome.operation,
                    destination = %outcome.destination.display(),
                    bytes = outcome.stats.bytes_written,
                    "task finished"
                );
                Ok(outcome)
            }
            Err(e) => {
                task.fail(&e);
                warn!(source = %request.source.display(), error = %e, "task failed");
                Err(e)
            }
        }
    }

    /// Run every request in order; one failure does not stop the rest.
    ///
    /// A request whose output path was already written earlier in the batch
    /// fails with `InvalidFileName` instead of overwriting it.
    pub fn run_batch(&mut self, requests: &[CipherRequest]) -> BatchReport {
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let entries = requests
            .iter()
            .map(|request| {
                let mut task = FileTransferTask::new(&request.source);
                let outcome = match self.destination_for(request) {
                    Ok(destination) if claimed.contains(&destination) => {
                        reject_duplicate(&mut task, destination);
                        None
                    }
                    _ => self.run_task(request, &mut task).ok(),
                };
                if let Some(outcome) = &outcome {
                    claimed.insert(outcome.destination.clone());
                }
                BatchEntry { task, outcome }
            })
            .collect();
        BatchReport { entries }
    }

    /// Decrypt a block range of a counter-mode file
    pub fn decrypt_range(&self, request: &RangeRequest) -> Result<Vec<u8>> {
        if !request.profile.is_counter_mode() {
            return Err(CipherError::Configuration(format!(
                "range decryption needs a counter-mode profile, got {}",
                request.profile
            )));
        }
        let key = decode_key(
            request.profile.algorithm(),
            request.key_size_bits,
            &request.encoded_key,
        )?;
        let iv = parse_iv_literal(&request.iv_literal, request.profile.iv_width())?;
        decrypt_range(
            &key,
            &iv,
            &request.source,
            request.block_index,
            request.block_count,
        )
    }

    /// Explicit destination, else `<output dir>/<name>.enc` or `<output dir>/<name>`
    fn destination_for(&self, request: &CipherRequest) -> Result<PathBuf> {
        match (&request.destination, request.operation) {
            (Some(path), _) => Ok(path.clone()),
            (None, Operation::Encrypt) => encrypted_output_path(&request.source, &self.output_dir),
            (None, Operation::Decrypt) => decrypted_output_path(&request.source, &self.output_dir),
        }
    }

    fn encrypt(
        &mut self,
        request: &CipherRequest,
        task: &mut FileTransferTask,
    ) -> Result<CipherOutcome> {
        let profile = &request.profile;
        let key = resolve_key(profile, request.key_size_bits, request.encoded_key.as_deref())?;
        let iv = resolve_iv(profile, request.iv_literal.as_deref())?;
        let generated = GeneratedSecrets {
            key_base64: key.generated().then(|| key.to_base64()),
            iv_literal: iv.generated().then(|| iv.to_literal()),
        };

        let destination = self.destination_for(request)?;
        task.set_destination(destination.clone());

        // secrets go out before any ciphertext exists
        if self.persist_generated && !generated.is_empty() {
            self.sink.persist(&request.source, &generated)?;
        }

        ensure_parent_dir(&destination)?;
        let stats = encrypt_file(profile, &key, &iv, &request.source, &destination, &self.options)?;

        Ok(CipherOutcome {
            operation: Operation::Encrypt,
            transform: profile.transform(),
            source: request.source.clone(),
            destination,
            stats,
            generated,
        })
    }

    fn decrypt(
        &mut self,
        request: &CipherRequest,
        task: &mut FileTransferTask,
    ) -> Result<CipherOutcome> {
        let profile = &request.profile;
        let key = required_key(profile, request)?;
        let iv = required_iv(profile, request)?;

        let destination = self.destination_for(request)?;
        task.set_destination(destination.clone());

        ensure_parent_dir(&destination)?;
        let stats = decrypt_file(profile, &key, &iv, &request.source, &destination, &self.options)?;

        Ok(CipherOutcome {
            operation: Operation::Decrypt,
            transform: profile.transform(),
            source: request.source.clone(),
            destination,
            stats,
            generated: GeneratedSecrets::default(),
        })
    }
}

impl Default for CipherEngine<NullSecretSink> {
    fn default() -> Self {
        Self::new(NullSecretSink)
    }
}

fn required_key(profile: &CipherProfile, request: &CipherRequest) -> Result<KeyMaterial> {
    let encoded = request
        .encoded_key
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| CipherError::KeyMaterial("decryption needs the encoded key".into()))?;
    decode_key(profile.algorithm(), request.key_size_bits, encoded)
}

fn required_iv(profile: &CipherProfile, request: &CipherRequest) -> Result<InitializationVector> {
    if !profile.needs_iv() {
        return Ok(InitializationVector::none());
    }
    let literal = request
        .iv_literal
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| CipherError::Iv(format!("decryption with {profile} needs the IV")))?;
    parse_iv_literal(literal, profile.iv_width())
}

fn reject_duplicate(task: &mut FileTransferTask, destination: PathBuf) {
    let err = CipherError::InvalidFileName(format!(
        "{} was already written by an earlier file in this batch",
        destination.display()
    ));
    warn!(source = %task.source().display(), error = %err, "task failed");
    task.begin();
    task.set_destination(destination);
    task.fail(&err);
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(std::fs::create_dir_all(dir)?),
        _ => Ok(()),
    }
}
