// src/bin/filecipher.rs
//! filecipher: encrypt / decrypt files and directory trees from the shell
//!
//!   encrypt <paths..>   - write `<name>.enc` for every file
//!   decrypt <paths..>   - decrypt every `*.enc` file found
//!   range <file>        - decrypt a block range of a CTR file
//!   profiles            - list supported transforms

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use walkdir::WalkDir;

use file_cipher::config::{self, Config};
use file_cipher::consts::ENCRYPTED_SUFFIX;
use file_cipher::{
    BatchReport, CipherEngine, CipherProfile, CipherRequest, FileSecretSink, NullSecretSink, Operation,
    RangeRequest, TaskStatus,
};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "filecipher", version, about = "Chunked AES / DES file encryption")]
struct Cli {
    /// Path to a filecipher.toml configuration file
    #[arg(long, short = 'c', env = "FILECIPHER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt files (directories are walked recursively)
    Encrypt {
        paths: Vec<PathBuf>,
        #[command(flatten)]
        profile: ProfileArgs,
        #[command(flatten)]
        secrets: SecretArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Decrypt `*.enc` files (directories are walked recursively)
    Decrypt {
        paths: Vec<PathBuf>,
        #[command(flatten)]
        profile: ProfileArgs,
        #[command(flatten)]
        secrets: SecretArgs,
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Decrypt `count` blocks starting at block `index` of a CTR file
    Range {
        file: PathBuf,
        #[command(flatten)]
        profile: ProfileArgs,
        #[command(flatten)]
        secrets: SecretArgs,
        #[arg(long)]
        index: u64,
        #[arg(long, default_value_t = 1)]
        count: u64,
        /// Write plaintext here instead of stdout
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// List every supported ALG/MODE/PADDING transform
    Profiles {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct ProfileArgs {
    #[arg(long, short = 'a', default_value = "AES")]
    algorithm: String,
    #[arg(long, short = 'm', default_value = "CTR")]
    mode: String,
    #[arg(long, short = 'p', default_value = "NoPadding")]
    padding: String,
    /// Key size in bits (AES: 128/192/256, DES: 56/64)
    #[arg(long, short = 'k', default_value_t = 128)]
    key_size: usize,
}

impl ProfileArgs {
    fn profile(&self) -> Result<CipherProfile> {
        Ok(CipherProfile::from_names(
            &self.algorithm,
            &self.mode,
            &self.padding,
        )?)
    }
}

#[derive(Args, Debug)]
struct SecretArgs {
    /// Base64 key; generated on encrypt when omitted
    #[arg(long, conflicts_with = "key_prompt")]
    key: Option<String>,
    /// Read the base64 key from the terminal without echo
    #[arg(long)]
    key_prompt: bool,
    /// IV as comma-separated signed bytes, e.g. "12,-5,0,..."
    #[arg(long)]
    iv: Option<String>,
}

impl SecretArgs {
    fn key(&self) -> Result<Option<String>> {
        if self.key_prompt {
            let entered = rpassword::prompt_password("Key (base64): ")
                .context("failed to read key from terminal")?;
            return Ok(Some(entered.trim().to_owned()));
        }
        Ok(self.key.clone())
    }
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Overrides `paths.output_dir` from the config
    #[arg(long, short = 'o')]
    output_dir: Option<PathBuf>,
    /// Print the batch report as JSON
    #[arg(long)]
    json: bool,
}

// ── Entry point ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => config::load().clone(),
    };

    match cli.command {
        Commands::Encrypt {
            paths,
            profile,
            secrets,
            output,
        } => cmd_transform(&config, Operation::Encrypt, &paths, &profile, &secrets, &output),
        Commands::Decrypt {
            paths,
            profile,
            secrets,
            output,
        } => cmd_transform(&config, Operation::Decrypt, &paths, &profile, &secrets, &output),
        Commands::Range {
            file,
            profile,
            secrets,
            index,
            count,
            out,
        } => cmd_range(&config, file, &profile, &secrets, index, count, out.as_deref()),
        Commands::Profiles { json } => cmd_profiles(json),
    }
}

// ── Commands ───────────────────────────────────────────────────────────────────

fn cmd_transform(
    config: &Config,
    operation: Operation,
    paths: &[PathBuf],
    profile_args: &ProfileArgs,
    secret_args: &SecretArgs,
    output: &OutputArgs,
) -> Result<()> {
    let profile = profile_args.profile()?;
    let key = secret_args.key()?;
    let files = collect_files(paths, operation);
    if files.is_empty() {
        bail!("no input files found");
    }
    info!(%operation, %profile, files = files.len(), "starting batch");

    let sink = FileSecretSink::new(config.secrets_dir());
    let mut engine = CipherEngine::from_config(config, sink);
    if let Some(dir) = &output.output_dir {
        engine = engine.with_output_dir(dir);
    }

    let requests: Vec<CipherRequest> = files
        .into_iter()
        .map(|source| {
            let mut request = CipherRequest::new(operation, profile, profile_args.key_size, source);
            request.encoded_key = key.clone();
            request.iv_literal = secret_args.iv.clone();
            request
        })
        .collect();

    let report = engine.run_batch(&requests);
    if output.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    let failed = report.count(TaskStatus::Failed);
    if failed > 0 {
        bail!("{failed} of {} file(s) failed", report.entries.len());
    }
    Ok(())
}

fn cmd_range(
    config: &Config,
    file: PathBuf,
    profile_args: &ProfileArgs,
    secret_args: &SecretArgs,
    block_index: u64,
    block_count: u64,
    out: Option<&Path>,
) -> Result<()> {
    let profile = profile_args.profile()?;
    let encoded_key = secret_args
        .key()?
        .context("range decryption needs --key or --key-prompt")?;
    let iv_literal = secret_args
        .iv
        .clone()
        .context("range decryption needs --iv")?;

    let engine = CipherEngine::from_config(config, NullSecretSink);
    let plaintext = engine.decrypt_range(&RangeRequest {
        profile,
        key_size_bits: profile_args.key_size,
        encoded_key,
        iv_literal,
        source: file,
        block_index,
        block_count,
    })?;
    debug!(bytes = plaintext.len(), "range decrypted");

    match out {
        Some(path) => std::fs::write(path, &plaintext)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&plaintext)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn cmd_profiles(json: bool) -> Result<()> {
    let profiles = CipherProfile::all();
    if json {
        let transforms: Vec<_> = profiles.iter().map(|p| p.transform()).collect();
        println!("{}", serde_json::to_string_pretty(&transforms)?);
        return Ok(());
    }
    println!("{:<32} {:>8} {:>8}", "TRANSFORM", "IV", "BLOCK");
    for profile in profiles {
        let iv = if profile.needs_iv() {
            profile.iv_width().to_string()
        } else {
            "-".to_owned()
        };
        println!(
            "{:<32} {:>8} {:>8}",
            profile.to_string(),
            iv,
            profile.block_width()
        );
    }
    Ok(())
}

// ── Helpers ────────────────────────────────────────────────────────────────────

/// Expand directories; decrypt only picks up `*.enc` files from a walk
fn collect_files(paths: &[PathBuf], operation: Operation) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
        {
            let candidate = entry.path();
            let is_encrypted = candidate
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with(ENCRYPTED_SUFFIX))
                .unwrap_or(false);
            let wanted = match operation {
                Operation::Encrypt => !is_encrypted,
                Operation::Decrypt => is_encrypted,
            };
            if wanted {
                files.push(candidate.to_path_buf());
            }
        }
    }
    files
}

fn print_report(report: &BatchReport) {
    println!("{:<12} {:<40} RESULT", "STATUS", "SOURCE");
    for entry in &report.entries {
        let task = &entry.task;
        let result = match (task.error(), task.destination()) {
            (Some(err), _) => err.to_owned(),
            (None, Some(dest)) => dest.display().to_string(),
            (None, None) => String::new(),
        };
        println!(
            "{:<12} {:<40} {}",
            task.status().display_text(),
            task.source().display(),
            result
        );
        if let Some(outcome) = &entry.outcome {
            if let Some(key) = &outcome.generated.key_base64 {
                println!("{:<12} generated key: {key}", "");
            }
            if let Some(iv) = &outcome.generated.iv_literal {
                println!("{:<12} generated iv:  {iv}", "");
            }
        }
    }
    println!(
        "\nFinished: {}  Failed: {}",
        report.count(TaskStatus::Finished),
        report.count(TaskStatus::Failed)
    );
}
