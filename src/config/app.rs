// src/config/app.rs
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    pub io: Io,
    pub secrets: Secrets,
    pub features: Features,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Paths {
    /// Where `<name>.enc` and decrypted files are written
    pub output_dir: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Io {
    pub chunk_size: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Secrets {
    /// Write generated keys/IVs to side files
    pub persist_generated: bool,
    pub dir: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Features {
    /// Write output through a temp file and rename on success
    pub atomic_writes: bool,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.paths.output_dir)
    }

    pub fn secrets_dir(&self) -> PathBuf {
        PathBuf::from(&self.secrets.dir)
    }
}

/// Config file to use, in priority order: `$FILECIPHER_CONFIG`,
/// `./filecipher.toml`, `<config dir>/filecipher/config.toml`.
pub fn locate() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|dir| dir.join("filecipher").join("config.toml"))
        .filter(|path| path.exists())
}

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Global config, loaded once. Missing or unreadable files fall back to defaults.
pub fn load() -> &'static Config {
    CONFIG.get_or_init(|| match locate() {
        Some(path) => match Config::from_path(&path) {
            Ok(conf) => {
                debug!(path = %path.display(), "loaded config");
                conf
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "config unusable, using built-in defaults");
                Config::default()
            }
        },
        None => {
            debug!("no config file found, using built-in defaults");
            Config::default()
        }
    })
}
