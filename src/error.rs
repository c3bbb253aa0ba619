//! Global error handling for dagdump
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

use crate::client::RemoteQueryError;

/// Global error type for dagdump operations
#[derive(Error, Debug)]
pub enum CrawlError {
    /// Remote node query errors
    #[error("Remote query error: {0}")]
    Remote(#[from] RemoteQueryError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV output errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The crawl was stopped through the shutdown flag
    #[error("Crawl interrupted")]
    Interrupted,
}

/// Specialized Result type for dagdump operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Creates a CrawlError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::CrawlError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}
