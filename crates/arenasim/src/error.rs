//! # Harness Error Types
//!
//! Everything that can stop a scripted run. Allocation failures keep the
//! step that caused them, so the caller can report where the script halted.

use std::path::PathBuf;

use arenasim_core::AllocError;
use thiserror::Error;

use crate::scenario::{Domain, Step};

/// Errors that can occur while loading or running a scenario.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A scenario or config file is not valid TOML for its schema.
    #[error("invalid file {path}: {source}")]
    Parse {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: toml::de::Error,
    },

    /// A number in the scenario does not fit the chosen address domain.
    #[error("{field} {value} does not fit the {domain} domain")]
    OutOfDomain {
        /// Which field.
        field: &'static str,
        /// The offending value.
        value: u64,
        /// The scenario's domain.
        domain: Domain,
    },

    /// The strategy rejected its initial capacity.
    #[error("cannot initialise arena: {0}")]
    Init(#[from] AllocError),

    /// A step failed; the run stopped there.
    #[error("step {index} ({step}) failed: {source}")]
    Step {
        /// 1-based step number.
        index: usize,
        /// The failing step.
        step: Step,
        /// What the strategy reported.
        #[source]
        source: AllocError,
    },

    /// Terminal interaction failed.
    #[error("terminal error: {0}")]
    Terminal(#[source] std::io::Error),

    /// The logging subscriber could not be installed.
    #[error("cannot install logging: {0}")]
    Logging(String),
}

/// Result type for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;
