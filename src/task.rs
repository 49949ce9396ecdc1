// src/task.rs
//! Per-file task status
//!
//! `Unprocessed → Processing → {Finished, Failed}`. Finished and Failed are
//! terminal; only the engine moves a task forward.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::CipherError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TaskStatus {
    #[default]
    Unprocessed,
    Processing,
    Finished,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Finished | TaskStatus::Failed)
    }

    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Unprocessed, TaskStatus::Processing)
                | (TaskStatus::Processing, TaskStatus::Finished)
                | (TaskStatus::Processing, TaskStatus::Failed)
        )
    }

    pub fn display_text(self) -> &'static str {
        match self {
            TaskStatus::Unprocessed => "Unprocessed",
            TaskStatus::Processing => "Processing",
            TaskStatus::Finished => "Finished",
            TaskStatus::Failed => "Failed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileTransferTask {
    source: PathBuf,
    destination: Option<PathBuf>,
    status: TaskStatus,
    error: Option<String>,
}

impl FileTransferTask {
    pub fn new<P: Into<PathBuf>>(source: P) -> Self {
        Self {
            source: source.into(),
            destination: None,
            status: TaskStatus::Unprocessed,
            error: None,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Known once processing has started
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Error text of a failed task
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn set_destination(&mut self, destination: PathBuf) {
        self.destination = Some(destination);
    }

    pub(crate) fn begin(&mut self) -> bool {
        self.advance(TaskStatus::Processing)
    }

    pub(crate) fn finish(&mut self) -> bool {
        self.advance(TaskStatus::Finished)
    }

    pub(crate) fn fail(&mut self, err: &CipherError) -> bool {
        let moved = self.advance(TaskStatus::Failed);
        if moved {
            self.error = Some(err.to_string());
        }
        moved
    }

    fn advance(&mut self, next: TaskStatus) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_do_not_move() {
        let mut task = FileTransferTask::new("a.txt");
        assert!(!task.finish());
        assert!(task.begin());
        assert!(!task.begin());
        assert!(task.fail(&CipherError::DecryptionFailed("bad padding".into())));
        assert_eq!(task.status(), TaskStatus::Failed);
        assert!(!task.finish());
        assert!(task.error().unwrap().contains("bad padding"));
    }
}
