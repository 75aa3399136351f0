//! GitHub Actions artifacts API client.
//!
//! Implements [`ArtefactLister`] and [`ArtefactDownloader`] over `ureq`.
//! Two agents are kept: API calls carry the bearer token and never follow
//! redirects, so the download endpoint's `Location` can be read back; the
//! archive download follows redirects and never sees the token.

use std::time::Duration;

use super::download::{ArchiveFormat, ArtefactDownloader, DownloadError};
use super::listing::{ArtefactLister, ArtefactPage, PAGE_SIZE, link_has_next, parse_listing};
use super::record::ArtefactId;
use crate::config::{AuthToken, RepoIdentity};
use log::debug;

/// Public GitHub REST API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// REST API version pinned through the `X-GitHub-Api-Version` header.
const API_VERSION: &str = "2022-11-28";

/// Media type for REST API responses.
const ACCEPT: &str = "application/vnd.github+json";

const USER_AGENT: &str = concat!("artefact-fetcher/", env!("CARGO_PKG_VERSION"));

/// Network timeout for listing and URL-resolution calls.
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout for archive downloads; the transfer itself is unbounded.
const DOWNLOAD_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the artifacts API of a GitHub (or GHES) instance.
pub struct GithubClient {
    api_url: String,
    token: AuthToken,
    api_agent: ureq::Agent,
    download_agent: ureq::Agent,
}

impl GithubClient {
    /// Create a client for the API rooted at `api_url`.
    ///
    /// # Examples
    ///
    /// ```
    /// use artefact_fetcher::artefact::github::GithubClient;
    /// use artefact_fetcher::config::{AuthToken, RepoIdentity};
    ///
    /// let token = AuthToken::try_from("ghs_example").expect("non-empty token");
    /// let client = GithubClient::new("https://ghe.example.com/api/v3/", token);
    /// let repo = RepoIdentity::try_from("octo/hello").expect("valid repo");
    /// assert_eq!(
    ///     client.artifacts_url(&repo),
    ///     "https://ghe.example.com/api/v3/repos/octo/hello/actions/artifacts"
    /// );
    /// ```
    #[must_use]
    pub fn new(api_url: &str, token: AuthToken) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            token,
            api_agent: api_agent(),
            download_agent: download_agent(),
        }
    }

    /// URL of the repository's artifact listing.
    #[must_use]
    pub fn artifacts_url(&self, repo: &RepoIdentity) -> String {
        format!(
            "{}/repos/{}/{}/actions/artifacts",
            self.api_url,
            repo.owner(),
            repo.repo()
        )
    }

    /// URL of the download-resolution endpoint for one artefact.
    #[must_use]
    pub fn download_endpoint(
        &self,
        repo: &RepoIdentity,
        id: &ArtefactId,
        format: ArchiveFormat,
    ) -> String {
        format!("{}/{id}/{format}", self.artifacts_url(repo))
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.token.expose())
    }
}

impl ArtefactLister for GithubClient {
    fn list_page(&self, repo: &RepoIdentity, page: u32) -> Result<ArtefactPage, DownloadError> {
        let url = self.artifacts_url(repo);
        let response = self
            .api_agent
            .get(&url)
            .query("per_page", PAGE_SIZE.to_string())
            .query("page", page.to_string())
            .header("Authorization", self.authorization())
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| map_ureq_error(&url, &e))?;
        check_status(&url, response.status().as_u16())?;

        let has_next = response
            .headers()
            .get("link")
            .and_then(|value| value.to_str().ok())
            .is_some_and(link_has_next);
        let text = response
            .into_body()
            .read_to_string()
            .map_err(|e| map_ureq_error(&url, &e))?;
        let body = parse_listing(&text).map_err(|e| DownloadError::InvalidResponse {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        debug!(
            "page {page}: {} artefact(s), {} in total, next page: {has_next}",
            body.artifacts.len(),
            body.total_count
        );

        Ok(ArtefactPage {
            artefacts: body.artifacts,
            has_next,
        })
    }
}

impl ArtefactDownloader for GithubClient {
    fn resolve_download_url(
        &self,
        repo: &RepoIdentity,
        id: &ArtefactId,
        format: ArchiveFormat,
    ) -> Result<String, DownloadError> {
        let url = self.download_endpoint(repo, id, format);
        let response = self
            .api_agent
            .get(&url)
            .header("Authorization", self.authorization())
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| map_ureq_error(&url, &e))?;

        let status = response.status().as_u16();
        if !(300..400).contains(&status) {
            check_status(&url, status)?;
            return Err(DownloadError::InvalidResponse {
                url,
                reason: format!("expected a redirect, got status {status}"),
            });
        }

        response
            .headers()
            .get("location")
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .ok_or_else(|| DownloadError::InvalidResponse {
                url: url.clone(),
                reason: "redirect without a Location header".to_owned(),
            })
    }

    fn fetch_archive(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let response = self
            .download_agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        response
            .into_body()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(|e| map_ureq_error(url, &e))
    }
}

/// Agent for authenticated API calls: statuses are inspected by the caller
/// and redirects are returned rather than followed.
fn api_agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(API_TIMEOUT))
        .http_status_as_error(false)
        .max_redirects(0)
        .max_redirects_will_error(false)
        .build();
    ureq::Agent::new_with_config(config)
}

/// Agent for archive downloads from pre-signed URLs.
fn download_agent() -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_connect(Some(DOWNLOAD_CONNECT_TIMEOUT))
        .build();
    ureq::Agent::new_with_config(config)
}

/// Map a non-success status code to a [`DownloadError`].
fn check_status(url: &str, status: u16) -> Result<(), DownloadError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(DownloadError::NotFound {
            url: url.to_owned(),
        }),
        other => Err(DownloadError::HttpError {
            url: url.to_owned(),
            reason: format!("status code {other}"),
        }),
    }
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
#[path = "github_tests.rs"]
mod tests;
