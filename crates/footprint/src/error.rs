//! Error types for footprint reports.
//!
//! Every error is fatal for a report run. None of them are retried: a failed
//! diagnostic run should be visibly failed.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a footprint report.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog could not be reached, authenticated against, or queried
    #[error("catalog unreachable: {message}")]
    Connectivity {
        /// Driver message describing the failure
        message: String,
    },

    /// An expected server setting is absent
    #[error("server setting not found: {setting}")]
    ConfigMissing {
        /// Name of the missing setting
        setting: String,
    },

    /// A catalog row could not be decoded into the expected types
    #[error("cannot decode catalog row{}: {message}", table.as_deref().map(|t| format!(" for {t}")).unwrap_or_default())]
    Scan {
        /// `schema.table` of the offending row, when it could be read
        table: Option<String>,
        /// Decoder message
        message: String,
    },

    /// A schema's data directory could not be listed
    #[error("cannot read schema directory {}: {source}", path.display())]
    DirectoryUnreadable {
        /// Directory that failed to list
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The probe worker pool could not be created
    #[error("cannot start probe workers: {message}")]
    ThreadPool {
        /// Pool builder message
        message: String,
    },
}

impl Error {
    /// Returns true if the catalog side failed (connection or query)
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Error::Connectivity { .. })
    }

    /// Returns true if the failure came from the filesystem side
    pub fn is_filesystem(&self) -> bool {
        matches!(self, Error::DirectoryUnreadable { .. })
    }
}

/// Result type for footprint operations
pub type Result<T> = std::result::Result<T, Error>;
