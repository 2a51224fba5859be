//! Fatal error classes.
//!
//! Usage and configuration errors abort the process before any account is
//! contacted, each with its own exit code so scripts can tell them apart.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for a missing action or an unparseable command line.
pub const USAGE_EXIT_CODE: u8 = 3;

/// Any failure that aborts the run before accounts are contacted.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Usage(e) => e.exit_code(),
            Error::Config(e) => e.exit_code(),
        }
    }
}

/// Contradictory or malformed command line flags.
#[derive(Error, Debug)]
pub enum UsageError {
    #[error("no action requested: use --away, --online, --clear, --emoji or --text")]
    NoAction,

    #[error("--clear cannot be used with --text or --emoji")]
    ClearWithStatus,

    #[error("--online and --away are mutually exclusive")]
    AwayAndOnline,

    #[error("--expires-at and --expires-in are mutually exclusive")]
    ConflictingExpiration,

    #[error("cannot parse expiration {value:?}: {reason}")]
    InvalidExpiration { value: String, reason: String },

    #[error("cannot use expiration when clearing the status")]
    ExpirationWithClear,
}

impl UsageError {
    pub fn exit_code(&self) -> u8 {
        match self {
            UsageError::NoAction => USAGE_EXIT_CODE,
            UsageError::ClearWithStatus => 4,
            UsageError::AwayAndOnline => 5,
            UsageError::ConflictingExpiration => 6,
            UsageError::InvalidExpiration { .. } => 7,
            UsageError::ExpirationWithClear => 8,
        }
    }
}

/// The credential table could not be produced.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failure while reading configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no tokens found for accounts: {}", .filter.join(", "))]
    NoAccounts { filter: Vec<String> },

    #[error("could not determine the home directory of the current user")]
    HomeDirectory,

    #[error("cannot initialize HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

impl ConfigError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ConfigError::Read { .. }
            | ConfigError::NoAccounts { .. }
            | ConfigError::HttpClient(_) => 1,
            ConfigError::HomeDirectory => 2,
        }
    }
}
