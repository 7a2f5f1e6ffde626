//! Artifact completeness audit and CI gate
//!
//! Audits a separately loaded artifacts manifest against each section's
//! required artifact types, then evaluates the result against a numeric
//! threshold for automated pipelines.

use crate::models::{ArtifactStatus, ArtifactsManifest, RoadmapManifest};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Per-section audit row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRow {
    pub section_id: String,
    pub required_types: Vec<String>,
    pub present_final_types: Vec<String>,
    pub missing_types: Vec<String>,
    pub final_count: usize,
    pub total_count: usize,
    /// Percentage of required types met; 100 when nothing is required
    pub completeness: u32,
}

/// Audit totals over the included scope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditSummary {
    pub included_sections: usize,
    pub all_required_final: usize,
    pub missing_required_total: usize,
    pub final_artifacts_total: usize,
}

/// Result of an artifact audit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    /// Rows sorted by section id
    pub rows: Vec<AuditRow>,
    pub summary: AuditSummary,
}

/// Audit sections in `include_ids` against the artifacts manifest.
///
/// Only `final` artifacts satisfy a required type; multiple failed or
/// superseded attempts of a type do not block once one final instance
/// exists.
pub fn build_artifact_audit(
    manifest: &RoadmapManifest,
    artifacts: &ArtifactsManifest,
    include_ids: &HashSet<String>,
) -> AuditResult {
    let by_section = artifacts.by_section();

    let mut rows: Vec<AuditRow> = manifest
        .sections
        .iter()
        .filter(|s| include_ids.contains(&s.id))
        .map(|section| {
            let all = by_section
                .get(&section.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let finals: Vec<_> = all
                .iter()
                .filter(|a| a.status == ArtifactStatus::Final)
                .collect();

            let mut present_final_types = Vec::new();
            for artifact in &finals {
                if !present_final_types.contains(&artifact.artifact_type) {
                    present_final_types.push(artifact.artifact_type.clone());
                }
            }

            let required = &section.required_artifact_types;
            let missing: Vec<String> = required
                .iter()
                .filter(|t| !present_final_types.contains(t))
                .cloned()
                .collect();

            let met = required.len() - missing.len();
            let completeness = if required.is_empty() {
                100
            } else {
                ((met as f64 / required.len() as f64) * 100.0).round() as u32
            };

            AuditRow {
                section_id: section.id.clone(),
                required_types: required.clone(),
                present_final_types,
                missing_types: missing,
                final_count: finals.len(),
                total_count: all.len(),
                completeness,
            }
        })
        .collect();

    rows.sort_by(|a, b| a.section_id.cmp(&b.section_id));

    let summary = AuditSummary {
        included_sections: rows.len(),
        all_required_final: rows.iter().filter(|r| r.missing_types.is_empty()).count(),
        missing_required_total: rows.iter().map(|r| r.missing_types.len()).sum(),
        final_artifacts_total: rows.iter().map(|r| r.final_count).sum(),
    };

    AuditResult { rows, summary }
}

/// A section failing the CI gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailingSection {
    pub section_id: String,
    pub completeness: u32,
    pub missing_required_types: Vec<String>,
}

/// Verdict of the CI artifact gate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiGateResult {
    pub pass: bool,
    pub threshold: u32,
    pub reasons: Vec<String>,
    pub failing_sections: Vec<FailingSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Evaluate an audit against a completeness threshold.
///
/// A section fails when it misses any required type or its completeness
/// falls below the threshold. With `strict_warning_fail`, a pending warning
/// (e.g. a project-id mismatch) also fails the gate.
pub fn evaluate_ci_gate(
    audit: &AuditResult,
    threshold: u32,
    warning: Option<&str>,
    strict_warning_fail: bool,
) -> CiGateResult {
    let failing: Vec<FailingSection> = audit
        .rows
        .iter()
        .filter(|r| !r.missing_types.is_empty() || r.completeness < threshold)
        .map(|r| FailingSection {
            section_id: r.section_id.clone(),
            completeness: r.completeness,
            missing_required_types: r.missing_types.clone(),
        })
        .collect();

    let mut reasons = Vec::new();
    if failing.iter().any(|f| !f.missing_required_types.is_empty()) {
        reasons.push("One or more sections are missing required final artifact types.".to_string());
    }
    if failing.iter().any(|f| f.completeness < threshold) {
        reasons.push(format!(
            "One or more sections are below CI completeness threshold ({}%).",
            threshold
        ));
    }
    if strict_warning_fail {
        if let Some(warning) = warning {
            reasons.push(format!("Strict warning failure: {}", warning));
        }
    }

    CiGateResult {
        pass: failing.is_empty() && !(strict_warning_fail && warning.is_some()),
        threshold,
        reasons,
        failing_sections: failing,
        warning: warning.map(String::from),
    }
}
