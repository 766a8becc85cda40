//! Error types and result type for the relsrc crate.
//!
//! This module defines all error variants that can occur while loading,
//! converting, and reloading external source strings. It uses the `snafu`
//! library for ergonomic error handling with automatic backtrace capture.
//!
//! # Examples
//!
//! ```
//! use relsrc::{Result, SourceError};
//!
//! fn load_source() -> Result<String> {
//!     // Return an error
//!     Err(SourceError::invalid_parameter("Empty source path"))
//! }
//!
//! fn handle_error() {
//!     match load_source() {
//!         Ok(data) => println!("Success: {}", data),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Variants
//!
//! - [`SourceError::FileNotFound`]: the source file does not exist
//! - [`SourceError::Io`]: I/O errors from file operations
//! - [`SourceError::EncodingError`]: malformed bytes under the requested encoding
//! - [`SourceError::MalformedPayload`]: payload length inconsistent with its encoding
//! - [`SourceError::LengthMismatch`]: a reload produced a buffer of the wrong length
//! - [`SourceError::AllocationFailure`]: string-buffer allocation failed
//! - [`SourceError::InvalidParameter`]: invalid function parameters

use std::io;
use snafu::{Snafu, Backtrace};

// Re-export snafu for context providers
pub use snafu;

/// Main error type for the relsrc crate.
///
/// All errors include automatic backtrace capture for debugging purposes.
/// Use the helper methods on `SourceError` for convenient error construction.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum SourceError {
    /// The source file does not exist.
    #[snafu(display("File not found: {path}"))]
    FileNotFound {
        path: String,
        backtrace: Backtrace,
    },

    /// I/O error occurred during file operations.
    #[snafu(display("IO error: {source}"))]
    Io {
        source: io::Error,
        backtrace: Backtrace,
    },

    /// Input bytes are malformed under the requested or detected encoding.
    #[snafu(display("Encoding error: {message}"))]
    EncodingError {
        message: String,
        backtrace: Backtrace,
    },

    /// Payload byte length is inconsistent with its declared encoding.
    #[snafu(display("Malformed payload: {message}"))]
    MalformedPayload {
        message: String,
        backtrace: Backtrace,
    },

    /// A reload produced a buffer whose length disagrees with the descriptor.
    #[snafu(display("Length mismatch: expected {expected} bytes, got {got}"))]
    LengthMismatch {
        expected: usize,
        got: usize,
        backtrace: Backtrace,
    },

    /// String-buffer allocation failed.
    #[snafu(display("Allocation failure: {size} bytes"))]
    AllocationFailure {
        size: usize,
        backtrace: Backtrace,
    },

    /// Function was called with invalid parameters.
    #[snafu(display("Invalid parameter: {message}"))]
    InvalidParameter {
        message: String,
        backtrace: Backtrace,
    },
}

// For automatic conversions from standard error types
impl From<io::Error> for SourceError {
    fn from(source: io::Error) -> Self {
        Self::Io { source, backtrace: Backtrace::capture() }
    }
}

impl From<std::string::FromUtf8Error> for SourceError {
    fn from(source: std::string::FromUtf8Error) -> Self {
        Self::EncodingError { message: format!("Invalid UTF-8 (String): {}", source), backtrace: Backtrace::capture() }
    }
}

impl From<std::str::Utf8Error> for SourceError {
    fn from(source: std::str::Utf8Error) -> Self {
        Self::EncodingError { message: format!("Invalid UTF-8 (&str): {}", source), backtrace: Backtrace::capture() }
    }
}

impl From<url::ParseError> for SourceError {
    fn from(source: url::ParseError) -> Self {
        Self::InvalidParameter { message: format!("Invalid URL: {}", source), backtrace: Backtrace::capture() }
    }
}

/// Helper methods for creating errors without context providers.
impl SourceError {
    /// Creates a `FileNotFound` error for the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// use relsrc::SourceError;
    ///
    /// let error = SourceError::file_not_found("/missing/script.js");
    /// ```
    pub fn file_not_found<S: Into<String>>(path: S) -> Self {
        Self::FileNotFound {
            path: path.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `EncodingError` with the given message.
    pub fn encoding_error<S: Into<String>>(message: S) -> Self {
        Self::EncodingError {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `MalformedPayload` error with the given message.
    pub fn malformed_payload<S: Into<String>>(message: S) -> Self {
        Self::MalformedPayload {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates a `LengthMismatch` error with expected and actual byte counts.
    pub fn length_mismatch(expected: usize, got: usize) -> Self {
        Self::LengthMismatch {
            expected,
            got,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `AllocationFailure` error for the given request size.
    pub fn allocation_failure(size: usize) -> Self {
        Self::AllocationFailure {
            size,
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `InvalidParameter` error with the given message.
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameter {
            message: message.into(),
            backtrace: Backtrace::capture(),
        }
    }

    /// Creates an `InvalidParameter` error for an invalid path.
    pub fn invalid_path<S: Into<String>>(path: S) -> Self {
        Self::InvalidParameter {
            message: format!("Invalid path: {}", path.into()),
            backtrace: Backtrace::capture(),
        }
    }

    /// Checks if this error is a `FileNotFound` variant.
    pub fn is_file_not_found(&self) -> bool {
        if let SourceError::FileNotFound { .. } = self {
            return true;
        }
        false
    }
}

/// A specialized `Result` type for relsrc operations.
///
/// This is a convenience type alias that uses [`SourceError`] as the error type.
pub type Result<T> = std::result::Result<T, SourceError>;
