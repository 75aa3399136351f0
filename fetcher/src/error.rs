//! Error types for a fetch run.
//!
//! Each stage reports its own error type; [`FetchError`] gathers them so the
//! entry point can report a single failure message.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::artefact::destination::InvalidArtefactName;
use crate::artefact::download::DownloadError;
use crate::artefact::extraction::ExtractionError;
use crate::config::ConfigError;

/// Errors that can end a fetch run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The configuration was missing or malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Listing, URL resolution, or archive download failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// An archive could not be read or extracted.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// An artefact name would place its files outside the destination.
    #[error(transparent)]
    InvalidArtefactName(#[from] InvalidArtefactName),

    /// The destination directory could not be created.
    #[error("failed to create destination {path}: {source}")]
    CreateDestination {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configured path could not be made absolute.
    #[error("failed to resolve destination {path}: {reason}")]
    ResolvePath {
        /// The configured path.
        path: Utf8PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// The step outputs could not be written.
    #[error("failed to write step outputs: {0}")]
    WriteOutput(#[source] std::io::Error),
}

/// Result alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
