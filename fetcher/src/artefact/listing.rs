//! Paginated artefact listing.
//!
//! The listing service returns artefacts a page at a time. [`ArtefactPages`]
//! walks those pages lazily as a finite, non-restartable iterator; a fresh
//! iterator starts a fresh cursor at page one.

use super::download::DownloadError;
use super::record::Artefact;
use crate::config::RepoIdentity;
use log::debug;
use serde::Deserialize;

/// Number of artefacts requested per listing page.
pub const PAGE_SIZE: u32 = 100;

/// One page of the artefact listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArtefactPage {
    /// Artefacts on this page, in service order.
    pub artefacts: Vec<Artefact>,
    /// Whether the service advertised a following page.
    pub has_next: bool,
}

/// Trait for fetching a single page of a repository's artefact listing.
///
/// Abstractions allow tests to script listings without network access.
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactLister {
    /// Fetch page `page` (1-based) of the listing for `repo`, [`PAGE_SIZE`]
    /// entries at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, is rejected, or the response
    /// body cannot be parsed.
    fn list_page(&self, repo: &RepoIdentity, page: u32) -> Result<ArtefactPage, DownloadError>;
}

/// Lazy iterator over the pages of an artefact listing.
///
/// Yields each page's artefacts until the service reports no further pages.
/// A failed page is yielded once as an error and ends the iteration.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::artefact::download::DownloadError;
/// use artefact_fetcher::artefact::listing::{ArtefactLister, ArtefactPage, ArtefactPages};
/// use artefact_fetcher::config::RepoIdentity;
///
/// struct Empty;
///
/// impl ArtefactLister for Empty {
///     fn list_page(&self, _repo: &RepoIdentity, _page: u32) -> Result<ArtefactPage, DownloadError> {
///         Ok(ArtefactPage::default())
///     }
/// }
///
/// let repo = RepoIdentity::try_from("octo/hello").expect("valid repo");
/// let pages: Vec<_> = ArtefactPages::new(&Empty, &repo).collect();
/// assert_eq!(pages.len(), 1);
/// ```
pub struct ArtefactPages<'a> {
    lister: &'a dyn ArtefactLister,
    repo: &'a RepoIdentity,
    next_page: Option<u32>,
}

impl<'a> ArtefactPages<'a> {
    /// Start a listing at the first page.
    #[must_use]
    pub fn new(lister: &'a dyn ArtefactLister, repo: &'a RepoIdentity) -> Self {
        Self {
            lister,
            repo,
            next_page: Some(1),
        }
    }

    /// Drain the iterator, concatenating every page in order.
    ///
    /// # Errors
    ///
    /// Returns the first page error; no partial listing is returned.
    pub fn collect_all(mut self) -> Result<Vec<Artefact>, DownloadError> {
        self.try_fold(Vec::new(), |mut all, page| {
            all.extend(page?);
            Ok(all)
        })
    }
}

impl Iterator for ArtefactPages<'_> {
    type Item = Result<Vec<Artefact>, DownloadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.next_page.take()?;
        debug!("listing artefacts for {} (page {page})", self.repo);
        match self.lister.list_page(self.repo, page) {
            Ok(listed) => {
                if listed.has_next && !listed.artefacts.is_empty() {
                    self.next_page = page.checked_add(1);
                }
                Some(Ok(listed.artefacts))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Body of a listing response.
#[derive(Debug, Deserialize)]
pub struct ListingBody {
    /// Total number of artefacts across all pages, as reported by the service.
    #[serde(default)]
    pub total_count: u64,
    /// Artefacts on this page.
    #[serde(default)]
    pub artifacts: Vec<Artefact>,
}

/// Parse a listing response body.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or an artefact record lacks an
/// identifier.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::artefact::listing::parse_listing;
///
/// let body = parse_listing(r#"{"total_count":1,"artifacts":[{"id":3,"name":"a"}]}"#)
///     .expect("valid listing");
/// assert_eq!(body.total_count, 1);
/// assert_eq!(body.artifacts[0].name(), "a");
/// ```
pub fn parse_listing(json: &str) -> Result<ListingBody, serde_json::Error> {
    serde_json::from_str(json)
}

/// Return true when an RFC 8288 `Link` header advertises a `next` relation.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::artefact::listing::link_has_next;
///
/// let header = r#"<https://api.example/x?page=2>; rel="next", <https://api.example/x?page=5>; rel="last""#;
/// assert!(link_has_next(header));
/// assert!(!link_has_next(r#"<https://api.example/x?page=1>; rel="prev""#));
/// ```
#[must_use]
pub fn link_has_next(header: &str) -> bool {
    header.split(',').any(|link| {
        link.split(';').skip(1).any(|param| {
            let Some((key, value)) = param.split_once('=') else {
                return false;
            };
            key.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|rel| rel.eq_ignore_ascii_case("next"))
        })
    })
}
