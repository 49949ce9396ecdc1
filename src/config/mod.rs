// src/config/mod.rs
//! Configuration system for file-cipher
//!
//! Central, lazy-loaded global config with TOML + env overrides.

pub use app::{load, locate, Config, Features, Io, Paths, Secrets};
pub use defaults::DEFAULT_OUTPUT_DIR;

mod app;
mod defaults;
