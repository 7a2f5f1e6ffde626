//! Roadmap section data model
//!
//! Sections form a hierarchical, dependency-linked graph loaded from a
//! roadmap manifest. Static fields (ids, hierarchy, declared dependencies)
//! are immutable after load; only `status`, checklist item statuses, and the
//! recorded artifact list evolve, exclusively through state machine events.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    NotStarted,
    InProgress,
    Blocked,
    Complete,
    RegressionBlocked,
}

impl SectionStatus {
    /// Get display name for status (matches the manifest wire format)
    pub fn name(&self) -> &'static str {
        match self {
            SectionStatus::NotStarted => "not_started",
            SectionStatus::InProgress => "in_progress",
            SectionStatus::Blocked => "blocked",
            SectionStatus::Complete => "complete",
            SectionStatus::RegressionBlocked => "regression_blocked",
        }
    }
}

/// Status of a single checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistStatus {
    NotStarted,
    Pass,
    Fail,
    Blocked,
}

impl ChecklistStatus {
    pub fn name(&self) -> &'static str {
        match self {
            ChecklistStatus::NotStarted => "not_started",
            ChecklistStatus::Pass => "pass",
            ChecklistStatus::Fail => "fail",
            ChecklistStatus::Blocked => "blocked",
        }
    }
}

/// One checklist entry within a section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Item id, pattern `<section_id>.c<n>` (e.g., "2.4.c1")
    pub id: String,
    pub text: String,
    pub status: ChecklistStatus,
}

/// Publication status of a recorded artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactStatus {
    Draft,
    Final,
    Failed,
    Superseded,
}

/// A recorded output tied to a section, used as completion evidence.
///
/// Only `final` artifacts count toward satisfying a required artifact type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRef {
    /// Unique within the owning section
    pub artifact_id: String,
    /// Matched against the section's `required_artifact_types`
    pub artifact_type: String,
    pub status: ArtifactStatus,
    /// Explicit verification outcome, when the artifact carries one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_pass: Option<bool>,
}

/// Partial update applied to an existing artifact reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ArtifactStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_pass: Option<bool>,
}

impl ArtifactRef {
    /// Apply a patch, leaving unset fields untouched
    pub fn apply(&mut self, patch: &ArtifactPatch) {
        if let Some(artifact_type) = &patch.artifact_type {
            self.artifact_type = artifact_type.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(verify_pass) = patch.verify_pass {
            self.verify_pass = Some(verify_pass);
        }
    }
}

/// A node in the roadmap graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Section id, pattern `<major>.<minor>` (e.g., "3.2"), globally unique
    pub id: String,
    pub title: String,
    /// Hierarchy depth; level-1 sections are roots
    pub level: u32,
    /// Parent section id; must be None for level-1 sections
    #[serde(default)]
    pub parent_id: Option<String>,
    pub status: SectionStatus,
    pub goal: String,
    /// Section ids that must be complete before this one may complete
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Artifact types that must each have at least one final artifact
    #[serde(default)]
    pub required_artifact_types: Vec<String>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    /// Completion rule label; default leaf rule applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_rule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_message: Option<String>,
    /// Advisory successor pointer, not a dependency edge
    #[serde(default)]
    pub next_section_id: Option<String>,
}

/// Default completion rule and related policy flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionPolicy {
    pub default_rule: String,
    pub requires_memory_entry: bool,
    pub requires_dependency_completion: bool,
}

/// UI rendering preferences carried by the manifest.
///
/// The core never interprets these; they are consumed by whatever layer
/// renders notification events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiBehavior {
    pub line_through_on_complete: bool,
    pub confetti_on_complete: bool,
    pub confetti_duration_ms: u64,
    pub toast_on_complete: bool,
    pub auto_select_next_section: bool,
    pub blocked_state_requires_remediation_card: bool,
}

/// The raw roadmap document: a sections list plus top-level metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadmapManifest {
    pub manifest_version: String,
    pub project_type: String,
    pub engine_target: String,
    #[serde(default)]
    pub status_enum: Vec<String>,
    #[serde(default)]
    pub artifact_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_policy: Option<CompletionPolicy>,
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_behavior: Option<UiBehavior>,
}

impl RoadmapManifest {
    /// Look up a section by id
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&SectionStatus::RegressionBlocked).unwrap();
        assert_eq!(json, "\"regression_blocked\"");
        assert_eq!(SectionStatus::RegressionBlocked.name(), "regression_blocked");
    }

    #[test]
    fn test_artifact_patch_applies_partial_fields() {
        let mut artifact = ArtifactRef {
            artifact_id: "1.1:report".to_string(),
            artifact_type: "check_report".to_string(),
            status: ArtifactStatus::Draft,
            verify_pass: None,
        };

        artifact.apply(&ArtifactPatch {
            status: Some(ArtifactStatus::Final),
            ..Default::default()
        });

        assert_eq!(artifact.status, ArtifactStatus::Final);
        assert_eq!(artifact.artifact_type, "check_report");
        assert_eq!(artifact.verify_pass, None);
    }

    #[test]
    fn test_section_deserializes_with_defaults() {
        let section: Section = serde_json::from_str(
            r#"{
                "id": "1.1",
                "title": "Child",
                "level": 2,
                "parent_id": "1.0",
                "status": "not_started",
                "goal": "Leaf"
            }"#,
        )
        .unwrap();

        assert!(section.dependencies.is_empty());
        assert!(section.checklist.is_empty());
        assert_eq!(section.next_section_id, None);
    }
}
