//! Error types for the report pipeline.
//!
//! Per-symbol failures (`DataUnavailable`) are contained by the report builder;
//! everything else is fatal to the step that raised it.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The data provider gave no usable closes for a symbol, even after the look-back fallback.
    #[error("[{symbol}] price data unavailable: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// The reference file exists but could not be read or written.
    #[error("reference store {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The reference file was readable but is not a flat JSON object of prices.
    #[error("reference store {} is corrupt: {source}", .path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failure while encoding JSON via serde_json.
    #[error("JSON serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The report template failed to render.
    #[error("failed to render report: {0}")]
    Template(#[from] askama::Error),

    /// HTTP client construction or transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A required environment variable is not set.
    #[error("environment variable {0} is not set")]
    MissingVar(&'static str),

    /// An environment variable is set but cannot be parsed.
    #[error("environment variable {name} is invalid: {value}")]
    InvalidVar { name: &'static str, value: String },

    /// Sender or recipient is not a valid mailbox.
    #[error("invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The email message could not be assembled.
    #[error("failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    /// The SMTP relay rejected the connection, login, or message.
    #[error("email delivery failed: {0}")]
    Delivery(#[from] lettre::transport::smtp::Error),
}

/// Crate-wide `Result` alias with [`Error`] as the default error.
pub type Result<T, E = Error> = std::result::Result<T, E>;
