//! Error types and handling for MS-SatShield
//!
//! This module defines all error types used throughout the system. The
//! per-packet detection path is infallible by design (see `spec.md` §7);
//! every variant here originates at construction time (configuration) or
//! in the CLI/config plumbing around the core.

use thiserror::Error;

/// Main result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for MS-SatShield.
#[derive(Error, Debug)]
pub enum Error {
    /// `key_mode` was not one of `"src"`, `"dst"`, `"src+dst"`.
    #[error("invalid key_mode: {0}")]
    InvalidKeyMode(String),

    /// Fan-out `mode` was not one of `"bitmap"`, `"hll-lite"`.
    #[error("invalid fanout mode: {0}")]
    InvalidFanoutMode(String),

    /// `norm_mode` was not one of the accepted score normalization modes.
    #[error("invalid norm_mode: {0}")]
    InvalidNormMode(String),

    /// `mapping` was not one of `"sigmoid"`, `"quantile"`.
    #[error("invalid queue mapping: {0}")]
    InvalidQueueMapping(String),

    /// Configuration could not be loaded or parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O failure while reading a config file or writing a CSV report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse failure while loading a config file.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// CSV encoding failure while writing a sweep report.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Construct a configuration error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
