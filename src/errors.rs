//! Error types for seismoview.
//!
//! Uses `thiserror` for library-style error definitions.

use thiserror::Error;

/// Errors that can occur in seismoview operations.
#[derive(Error, Debug)]
pub enum SeismoviewError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status
    #[error("USGS API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// CSV tokenizing failed
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Feed body had no header line
    #[error("Feed body is empty (missing header line)")]
    MissingHeader,

    /// Header does not match the known column layout
    #[error("Unexpected feed layout: column {column} is '{found}', expected '{expected}'")]
    Schema {
        column: usize,
        expected: &'static str,
        found: String,
    },

    /// Terminal or output I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
