//! Unit tests for latest-by-timestamp selection.

use super::*;
use crate::artefact::record::UpdatedAt;
use rstest::rstest;
use std::collections::HashSet;

fn at(raw: &str) -> UpdatedAt {
    UpdatedAt::parse(raw).expect("valid timestamp")
}

fn artefact(id: u64, name: &str, updated_at: &str) -> Artefact {
    Artefact::new(id, name, at(updated_at))
}

fn undated(id: u64, name: &str) -> Artefact {
    Artefact::new(id, name, UpdatedAt::missing())
}

fn ids(artefacts: &[Artefact]) -> Vec<&str> {
    artefacts.iter().map(|a| a.id().as_str()).collect()
}

#[test]
fn latest_of_empty_slice_is_none() {
    assert!(latest(&[]).is_none());
}

#[test]
fn latest_of_single_element_is_that_element() {
    let only = [undated(9, "a")];
    assert_eq!(latest(&only).map(|a| a.id().as_str()), Some("9"));
}

#[test]
fn first_strictly_greater_timestamp_wins_ties() {
    let artefacts = [
        artefact(1, "a", "2024-01-01"),
        artefact(2, "b", "2024-01-02"),
        artefact(3, "c", "2024-01-02"),
    ];
    assert_eq!(latest(&artefacts).map(|a| a.id().as_str()), Some("2"));
}

#[test]
fn equal_timestamps_keep_the_first_element() {
    let artefacts = [
        artefact(1, "a", "2024-01-01"),
        artefact(2, "a", "2024-01-01"),
    ];
    assert_eq!(latest(&artefacts).map(|a| a.id().as_str()), Some("1"));
}

#[rstest]
#[case::missing_first(vec![undated(1, "a"), artefact(2, "a", "2024-01-01")])]
#[case::missing_last(vec![artefact(2, "a", "2024-01-01"), undated(1, "a")])]
#[case::missing_between(vec![
    artefact(3, "a", "2023-06-01"),
    undated(1, "a"),
    artefact(2, "a", "2024-01-01"),
])]
fn missing_timestamp_never_outranks_present_one(#[case] artefacts: Vec<Artefact>) {
    assert_eq!(latest(&artefacts).map(|a| a.id().as_str()), Some("2"));
}

#[test]
fn all_missing_timestamps_keep_the_first_element() {
    let artefacts = [undated(4, "a"), undated(5, "a")];
    assert_eq!(latest(&artefacts).map(|a| a.id().as_str()), Some("4"));
}

#[test]
fn per_name_pass_keeps_one_artefact_per_name_in_discovery_order() {
    let artefacts = vec![
        artefact(1, "b", "2024-01-01"),
        artefact(2, "a", "2024-01-01"),
        artefact(3, "b", "2024-01-03"),
        artefact(4, "c", "2024-01-01"),
        artefact(5, "a", "2024-01-02"),
    ];
    let selected = latest_per_name(artefacts);
    assert_eq!(ids(&selected), vec!["3", "5", "4"]);
}

#[test]
fn per_name_pass_output_size_equals_distinct_names() {
    let artefacts = vec![
        undated(1, "x"),
        undated(2, "y"),
        undated(3, "x"),
        undated(4, ""),
        undated(5, ""),
    ];
    let distinct: HashSet<String> = artefacts.iter().map(|a| a.name().to_owned()).collect();
    let selected = latest_per_name(artefacts);
    assert_eq!(selected.len(), distinct.len());
    let names: HashSet<&str> = selected.iter().map(Artefact::name).collect();
    assert_eq!(names.len(), selected.len());
}

#[test]
fn selection_without_latest_only_keeps_newest_of_each_name() {
    let filtered = vec![
        artefact(1, "a", "2024-01-01"),
        artefact(2, "a", "2024-01-02"),
        artefact(3, "b", "2024-01-01"),
    ];
    let selected = select_artefacts(filtered, false);
    assert_eq!(ids(&selected), vec!["2", "3"]);
}

#[test]
fn selection_with_latest_only_keeps_single_newest() {
    let filtered = vec![
        artefact(1, "a", "2024-01-01"),
        artefact(2, "a", "2024-01-02"),
        artefact(3, "b", "2024-01-01"),
    ];
    let selected = select_artefacts(filtered, true);
    assert_eq!(ids(&selected), vec!["2"]);
}

#[rstest]
#[case::latest_only(true)]
#[case::per_name(false)]
fn empty_input_selects_nothing(#[case] latest_only: bool) {
    assert!(select_artefacts(Vec::new(), latest_only).is_empty());
}

#[test]
fn selection_is_a_subset_without_duplicate_ids() {
    let filtered = vec![
        artefact(1, "a", "2024-01-01"),
        artefact(2, "b", "2024-01-05"),
        artefact(3, "a", "2024-01-03"),
        undated(4, "c"),
    ];
    let listed: HashSet<String> = filtered.iter().map(|a| a.id().to_string()).collect();
    let selected = select_artefacts(filtered, false);
    let selected_ids: HashSet<String> = selected.iter().map(|a| a.id().to_string()).collect();
    assert_eq!(selected_ids.len(), selected.len());
    assert!(selected_ids.is_subset(&listed));
}
