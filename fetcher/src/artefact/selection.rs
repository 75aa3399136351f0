//! Latest-by-timestamp artefact selection.
//!
//! Selection runs two reductions over the filtered listing, both built on the
//! same comparison rule ([`latest`]):
//!
//! - a global pass, enabled by the latest-only setting, that keeps the single
//!   most recently updated artefact;
//! - a per-name pass, always applied, that keeps the most recently updated
//!   artefact of each distinct name in first-seen order.

use super::record::Artefact;

/// Return the most recently updated artefact, or `None` for an empty slice.
///
/// The slice is folded left to right and the current best is only replaced
/// by a candidate whose timestamp is strictly greater, so ties keep the
/// element seen first. A missing timestamp orders below every present one.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::artefact::record::{Artefact, UpdatedAt};
/// use artefact_fetcher::artefact::selection::latest;
///
/// let at = |raw| UpdatedAt::parse(raw).expect("valid date");
/// let artefacts = [
///     Artefact::new(1_u64, "a", at("2024-01-01")),
///     Artefact::new(2_u64, "b", at("2024-01-02")),
///     Artefact::new(3_u64, "c", at("2024-01-02")),
/// ];
/// let best = latest(&artefacts).expect("non-empty");
/// assert_eq!(best.id().as_str(), "2");
/// ```
#[must_use]
pub fn latest(artefacts: &[Artefact]) -> Option<&Artefact> {
    let (first, rest) = artefacts.split_first()?;
    Some(rest.iter().fold(first, |best, candidate| {
        if candidate.updated_at() > best.updated_at() {
            candidate
        } else {
            best
        }
    }))
}

/// Keep the most recently updated artefact of each distinct name.
///
/// Groups are keyed by exact name equality and emitted in the order their
/// first member appears in `artefacts`.
#[must_use]
pub fn latest_per_name(artefacts: Vec<Artefact>) -> Vec<Artefact> {
    let mut groups: Vec<Vec<Artefact>> = Vec::new();
    for artefact in artefacts {
        match groups
            .iter_mut()
            .find(|group| group.first().is_some_and(|head| head.name() == artefact.name()))
        {
            Some(group) => group.push(artefact),
            None => groups.push(vec![artefact]),
        }
    }
    groups
        .iter()
        .filter_map(|group| latest(group).cloned())
        .collect()
}

/// Reduce the filtered listing to the selection set.
///
/// When `latest_only` is set the listing is first narrowed to the single
/// latest artefact; the per-name pass then always runs. An empty listing
/// yields an empty selection.
///
/// # Examples
///
/// ```
/// use artefact_fetcher::artefact::record::{Artefact, UpdatedAt};
/// use artefact_fetcher::artefact::selection::select_artefacts;
///
/// let at = |raw| UpdatedAt::parse(raw).expect("valid date");
/// let filtered = vec![
///     Artefact::new(1_u64, "a", at("2024-01-01")),
///     Artefact::new(2_u64, "a", at("2024-01-02")),
///     Artefact::new(3_u64, "b", at("2024-01-01")),
/// ];
///
/// let per_name = select_artefacts(filtered.clone(), false);
/// assert_eq!(per_name.len(), 2);
///
/// let only_latest = select_artefacts(filtered, true);
/// assert_eq!(only_latest.len(), 1);
/// assert_eq!(only_latest[0].id().as_str(), "2");
/// ```
#[must_use]
pub fn select_artefacts(filtered: Vec<Artefact>, latest_only: bool) -> Vec<Artefact> {
    if filtered.is_empty() {
        return filtered;
    }
    let working = if latest_only {
        latest(&filtered).cloned().into_iter().collect()
    } else {
        filtered
    };
    latest_per_name(working)
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
