//! Expiry and name filtering of the artefact listing.

use super::record::Artefact;

/// Keep unexpired artefacts, and only those named `name_filter` when one is set.
///
/// The relative order of the listing is preserved. An empty filter string is
/// treated the same as no filter.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::artefact::filter::filter_artefacts;
/// use artefact_fetcher::artefact::record::{Artefact, UpdatedAt};
///
/// let listing = vec![
///     Artefact::new(1_u64, "dist", UpdatedAt::missing()),
///     Artefact::new(2_u64, "dist", UpdatedAt::missing()).with_expired(true),
///     Artefact::new(3_u64, "docs", UpdatedAt::missing()),
/// ];
/// let kept = filter_artefacts(listing, Some("dist"));
/// assert_eq!(kept.len(), 1);
/// assert_eq!(kept[0].id().as_str(), "1");
/// ```
#[must_use]
pub fn filter_artefacts(listing: Vec<Artefact>, name_filter: Option<&str>) -> Vec<Artefact> {
    let name_filter = name_filter.filter(|name| !name.is_empty());
    listing
        .into_iter()
        .filter(|artefact| !artefact.is_expired())
        .filter(|artefact| name_filter.is_none_or(|name| artefact.name() == name))
        .collect()
}
