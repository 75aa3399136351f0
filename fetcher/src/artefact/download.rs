//! Artefact download abstractions.
//!
//! Downloading is split in two steps: resolving a short-lived archive URL
//! for an artefact, then fetching the archive bytes from that URL. A
//! trait-based abstraction keeps both steps injectable for testing.

use super::record::ArtefactId;
use crate::config::RepoIdentity;
use std::fmt;

/// Archive format requested from the download-resolution endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArchiveFormat {
    /// A zip archive; the only format the artifacts API serves.
    #[default]
    Zip,
}

impl ArchiveFormat {
    /// Path segment used by the download-resolution endpoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "zip",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trait for resolving and fetching artefact archives.
///
/// # Examples
///
/// ```no_run
/// use artefact_fetcher::artefact::download::{ArchiveFormat, ArtefactDownloader};
/// use artefact_fetcher::artefact::github::GithubClient;
/// use artefact_fetcher::artefact::record::ArtefactId;
/// use artefact_fetcher::config::{AuthToken, RepoIdentity};
///
/// let token = AuthToken::try_from("ghs_example").expect("non-empty token");
/// let client = GithubClient::new("https://api.github.com", token);
/// let repo = RepoIdentity::try_from("octo/hello").expect("valid repo");
/// let url = client
///     .resolve_download_url(&repo, &ArtefactId::from(1_u64), ArchiveFormat::Zip)
///     .expect("resolved");
/// let bytes = client.fetch_archive(&url).expect("downloaded");
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactDownloader {
    /// Resolve the time-limited download URL for artefact `id` of `repo`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service does not answer
    /// with a redirect location.
    fn resolve_download_url(
        &self,
        repo: &RepoIdentity,
        id: &ArtefactId,
        format: ArchiveFormat,
    ) -> Result<String, DownloadError>;

    /// Fetch the full archive at `url` into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or answers with a non-success
    /// status.
    fn fetch_archive(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// Errors arising from listing, URL resolution, and archive download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed or the service rejected it.
    #[error("request failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested resource was not found (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The service answered, but not in the expected shape.
    #[error("unexpected response from {url}: {reason}")]
    InvalidResponse {
        /// The URL that was requested.
        url: String,
        /// What was wrong with the response.
        reason: String,
    },

    /// I/O error while reading a response body.
    #[error("I/O error reading download: {0}")]
    Io(#[from] std::io::Error),
}
