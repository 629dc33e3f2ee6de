//! Error types for collection loading and evaluation

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while loading collections or configuring an evaluation
#[derive(Debug, Error)]
pub enum EvalError {
    /// The input file could not be opened
    #[error("failed on opening {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading the input file failed after it was opened
    #[error("failed on reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input file holds zero bytes
    #[error("the file '{}' is empty", .path.display())]
    EmptyFile { path: PathBuf },

    /// Membership hint must be a finite positive number
    #[error("invalid membership hint {0}, expected a finite value > 0")]
    InvalidMembership(f32),

    /// A trace or validate level outside of 0..=2
    #[error("invalid {name} {value}, expected 0..=2")]
    InvalidLevel { name: &'static str, value: u8 },

    /// The similarity report could not be written
    #[error("failed on writing the report to {}: {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
