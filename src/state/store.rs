//! Section store: the evolving snapshot the state machine reduces over
//!
//! A store is never mutated in place by callers. Each processed event clones
//! the current snapshot and returns a replacement, so any prior snapshot
//! stays valid as an immutable history checkpoint. Ordered maps keep
//! serialized snapshots byte-deterministic.

use crate::models::{ArtifactRef, Section, SectionStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Snapshot of section statuses, checklist states, and recorded artifacts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionStore {
    /// Section id -> section
    pub by_id: BTreeMap<String, Section>,
    /// Parent id -> child ids, in source-manifest order
    pub children_by_parent: BTreeMap<String, Vec<String>>,
    /// Section id -> recorded artifacts, in insertion order
    pub artifacts_by_section: BTreeMap<String, Vec<ArtifactRef>>,
}

impl SectionStore {
    /// Resolved child sections of a section, skipping dangling ids
    pub fn children(&self, section_id: &str) -> Vec<&Section> {
        self.children_by_parent
            .get(section_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .collect()
    }

    /// Recorded artifacts for a section
    pub fn artifacts(&self, section_id: &str) -> &[ArtifactRef] {
        self.artifacts_by_section
            .get(section_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Completion progress over a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub total: usize,
    pub complete: usize,
    /// Rounded percentage; 0 for an empty store
    pub percent: u32,
}

/// Build the initial store from a validated section list.
///
/// Sections are cloned in; child lists follow the order sections appear in
/// the source list. Validation is the caller's precondition — the store does
/// not re-check graph structure.
pub fn initialize_store(sections: &[Section]) -> SectionStore {
    let mut by_id = BTreeMap::new();
    let mut children_by_parent: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for section in sections {
        by_id.insert(section.id.clone(), section.clone());
        if let Some(parent_id) = &section.parent_id {
            children_by_parent
                .entry(parent_id.clone())
                .or_default()
                .push(section.id.clone());
        }
    }

    SectionStore {
        by_id,
        children_by_parent,
        artifacts_by_section: BTreeMap::new(),
    }
}

/// Count complete sections and report a rounded percentage
pub fn compute_progress(store: &SectionStore) -> Progress {
    let total = store.by_id.len();
    let complete = store
        .by_id
        .values()
        .filter(|s| s.status == SectionStatus::Complete)
        .count();
    let percent = if total == 0 {
        0
    } else {
        ((complete as f64 / total as f64) * 100.0).round() as u32
    };

    Progress {
        total,
        complete,
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SectionStatus;

    fn section(id: &str, level: u32, parent: Option<&str>) -> Section {
        Section {
            id: id.to_string(),
            title: format!("Section {}", id),
            level,
            parent_id: parent.map(String::from),
            status: SectionStatus::NotStarted,
            goal: String::new(),
            dependencies: Vec::new(),
            required_artifact_types: Vec::new(),
            checklist: Vec::new(),
            completion_rule: None,
            completion_message: None,
            next_section_id: None,
        }
    }

    #[test]
    fn test_initialize_builds_child_lists_in_order() {
        let store = initialize_store(&[
            section("1.0", 1, None),
            section("1.2", 2, Some("1.0")),
            section("1.1", 2, Some("1.0")),
        ]);

        assert_eq!(store.children_by_parent["1.0"], vec!["1.2", "1.1"]);
        assert!(store.artifacts_by_section.is_empty());
    }

    #[test]
    fn test_progress_on_empty_store() {
        let store = initialize_store(&[]);
        let progress = compute_progress(&store);
        assert_eq!(progress.total, 0);
        assert_eq!(progress.percent, 0);
    }

    #[test]
    fn test_progress_rounds_percentage() {
        let mut store = initialize_store(&[
            section("1.0", 1, None),
            section("2.0", 1, None),
            section("3.0", 1, None),
        ]);
        store.by_id.get_mut("1.0").unwrap().status = SectionStatus::Complete;

        let progress = compute_progress(&store);
        assert_eq!(progress.complete, 1);
        assert_eq!(progress.percent, 33);
    }

    #[test]
    fn test_snapshots_do_not_alias() {
        let store = initialize_store(&[section("1.0", 1, None)]);
        let mut copy = store.clone();
        copy.by_id.get_mut("1.0").unwrap().status = SectionStatus::Complete;

        assert_eq!(store.by_id["1.0"].status, SectionStatus::NotStarted);
        assert_eq!(copy.by_id["1.0"].status, SectionStatus::Complete);
    }
}
