//! Failure taxonomy for the refresh pipeline.
//!
//! Every stage returns a tagged error; nothing in the pipeline terminates
//! the process itself. The driver in `main` maps any variant to a printed
//! message and a non-zero exit.

use std::io;
use std::path::PathBuf;

/// A fatal, run-ending error. One variant per failure kind.
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    /// The credentials file could not be read.
    #[error("could not read the credentials file {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },

    /// The credentials file or its backup could not be written.
    #[error("could not write {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },

    /// The credentials file is not valid INI text.
    #[error("could not parse the credentials file {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },

    /// The source profile section is absent from the file.
    #[error("could not find the source profile '{name}' in the credentials file")]
    MissingProfile { name: String },

    /// A required value is absent or empty, in the file or the options.
    #[error("the {context} does not have a '{field}' value")]
    MissingField { context: String, field: String },

    /// The session token exchange with STS failed.
    #[error("failed to exchange the MFA code for session credentials: {0:#}")]
    Exchange(anyhow::Error),

    /// `~` could not be expanded because no home directory was found.
    #[error("could not determine the home directory")]
    NoHomeDir,
}

pub type Result<T> = std::result::Result<T, CliError>;
