//! Artifacts manifest model
//!
//! A separately loaded deliverables document audited against the roadmap's
//! `required_artifact_types`. Distinct from [`crate::models::ArtifactRef`],
//! which is the in-store record the state machine mutates.

use crate::models::section::ArtifactStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Verification block attached to an artifact entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactVerification {
    pub verify_pass: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_checks: Vec<String>,
}

/// One entry in the artifacts manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactItem {
    pub artifact_id: String,
    pub project_id: String,
    pub section_id: String,
    pub task_id: String,
    pub producer_agent: String,
    pub artifact_type: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub status: ArtifactStatus,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspect_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_artifact_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<ArtifactVerification>,
}

/// The artifacts manifest document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsManifest {
    pub manifest_version: String,
    pub project_id: String,
    #[serde(default)]
    pub artifact_types: Vec<String>,
    pub artifacts: Vec<ArtifactItem>,
}

impl ArtifactsManifest {
    /// Group artifact entries by owning section id
    pub fn by_section(&self) -> BTreeMap<String, Vec<&ArtifactItem>> {
        let mut grouped: BTreeMap<String, Vec<&ArtifactItem>> = BTreeMap::new();
        for artifact in &self.artifacts {
            grouped
                .entry(artifact.section_id.clone())
                .or_default()
                .push(artifact);
        }
        grouped
    }
}
