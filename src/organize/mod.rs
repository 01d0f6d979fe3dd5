//! Batch copy/move of a source tree into a destination tree.
//!
//! The worker loop runs on one background thread and reports through a
//! channel of [`OrganizeMessage`]s; per-file failures are logged and skipped.

mod job;
mod messages;
mod transfer;
mod worker;

use std::{fmt, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::naming::{NamingRules, StructureMode};

pub use job::{OrganizeJob, OrganizeRunner, spawn_organize};
pub use messages::{LogKind, LogLine, OrganizeFinished, OrganizeMessage};
pub use transfer::{TransferError, TransferOutcome, TransferRequest, transfer_file};
pub use worker::run_organize_with_progress;

/// Whether files are copied or moved into the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    #[default]
    Copy,
    Move,
}

impl Operation {
    /// Upper-case label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            Operation::Copy => "COPY",
            Operation::Move => "MOVE",
        }
    }
}

/// What to do when the computed target already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    /// Replace the existing file.
    #[default]
    Overwrite,
    /// Leave the existing file and skip the source.
    Skip,
    /// Write alongside as `name_1.ext`, `name_2.ext`, ...
    Rename,
}

impl ConflictPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ConflictPolicy::Overwrite => "overwrite",
            ConflictPolicy::Skip => "skip",
            ConflictPolicy::Rename => "rename",
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictPolicy {
    type Err = OrganizeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        [Self::Overwrite, Self::Skip, Self::Rename]
            .into_iter()
            .find(|policy| policy.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| OrganizeError::UnknownConflictPolicy(value.to_string()))
    }
}

/// Everything one organize run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizeOptions {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub operation: Operation,
    /// Log what would happen without touching the filesystem.
    pub dry_run: bool,
    pub keep_names: bool,
    pub structure: StructureMode,
    /// Maximum total path length from the active hardware profile.
    pub path_limit: Option<usize>,
    pub conflict: ConflictPolicy,
}

impl OrganizeOptions {
    pub fn naming_rules(&self) -> NamingRules {
        NamingRules {
            keep_names: self.keep_names,
            structure: self.structure,
            path_limit: self.path_limit,
        }
    }

    /// Check that both roots are existing directories.
    pub fn validate(&self) -> Result<(), OrganizeError> {
        if self.source.as_os_str().is_empty() || !self.source.is_dir() {
            return Err(OrganizeError::InvalidSource(self.source.clone()));
        }
        if self.destination.as_os_str().is_empty() || !self.destination.is_dir() {
            return Err(OrganizeError::InvalidDestination(self.destination.clone()));
        }
        Ok(())
    }
}

/// Errors that prevent an organize run from starting.
#[derive(Debug, Error)]
pub enum OrganizeError {
    #[error("Please navigate to a source directory (got '{}')", .0.display())]
    InvalidSource(PathBuf),
    #[error("Please select a valid destination folder (got '{}')", .0.display())]
    InvalidDestination(PathBuf),
    #[error("An organize run is already in progress")]
    AlreadyRunning,
    #[error("Unknown conflict policy '{0}' (expected overwrite, skip or rename)")]
    UnknownConflictPolicy(String),
    #[error("Failed to start organize worker: {0}")]
    Spawn(std::io::Error),
    #[error("Organize worker panicked")]
    WorkerPanicked,
}
