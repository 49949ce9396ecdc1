// src/config/defaults.rs
use crate::config::app::{Io, Paths, Secrets};
use crate::consts::DEFAULT_CHUNK_SIZE;

pub const DEFAULT_OUTPUT_DIR: &str = "output";

impl Default for Paths {
    fn default() -> Self {
        Self {
            output_dir: DEFAULT_OUTPUT_DIR.into(),
        }
    }
}

impl Default for Io {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl Default for Secrets {
    fn default() -> Self {
        Self {
            persist_generated: true,
            dir: DEFAULT_OUTPUT_DIR.into(),
        }
    }
}
