//! Roadmap health reporting
//!
//! Read-only diagnostics over a validated manifest: per-section blockers,
//! next-section suggestion, and the full doctor report consumed by the CLI
//! and the markdown brief.

use crate::models::{ChecklistStatus, RoadmapManifest, Section, SectionStatus};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

fn by_id(manifest: &RoadmapManifest) -> HashMap<&str, &Section> {
    manifest.sections.iter().map(|s| (s.id.as_str(), s)).collect()
}

/// List everything currently preventing a section from completing:
/// unmet or missing dependencies, and checklist items not passing.
pub fn find_blockers(manifest: &RoadmapManifest, section_id: &str) -> Vec<String> {
    let sections = by_id(manifest);
    let Some(section) = sections.get(section_id) else {
        return vec![format!("Unknown section: {}", section_id)];
    };

    let mut blockers = Vec::new();

    for dep_id in &section.dependencies {
        match sections.get(dep_id.as_str()) {
            None => blockers.push(format!("Missing dependency reference: {}", dep_id)),
            Some(dep) if dep.status != SectionStatus::Complete => blockers.push(format!(
                "Dependency not complete: {} ({})",
                dep_id,
                dep.status.name()
            )),
            Some(_) => {}
        }
    }

    for item in &section.checklist {
        if item.status != ChecklistStatus::Pass {
            blockers.push(format!(
                "Checklist not passing: {} ({})",
                item.id,
                item.status.name()
            ));
        }
    }

    blockers
}

/// Suggest where to work next: the declared next pointer when it resolves,
/// otherwise the first not-complete section whose dependencies are all
/// complete.
pub fn next_section(manifest: &RoadmapManifest, section_id: &str) -> String {
    let sections = by_id(manifest);
    let Some(current) = sections.get(section_id) else {
        return format!("Unknown section: {}", section_id);
    };

    if let Some(next_id) = &current.next_section_id {
        if sections.contains_key(next_id.as_str()) {
            return next_id.clone();
        }
    }

    for candidate in &manifest.sections {
        if candidate.status == SectionStatus::Complete {
            continue;
        }
        let deps_ok = candidate.dependencies.iter().all(|d| {
            sections
                .get(d.as_str())
                .map(|dep| dep.status == SectionStatus::Complete)
                .unwrap_or(false)
        });
        if deps_ok {
            return candidate.id.clone();
        }
    }

    "No available next section (all complete or blocked).".to_string()
}

/// Status counts over the whole manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub total_sections: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub blocked: usize,
    pub not_started: usize,
}

/// Full health report for a manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorReport {
    pub generated_at: String,
    pub summary: DoctorSummary,
    /// Sections whose dependencies are all complete and are not themselves complete
    pub ready_now: Vec<String>,
    pub blockers_by_section: BTreeMap<String, Vec<String>>,
    /// Sections in progress or complete while a dependency is not complete
    pub dependency_violations: Vec<String>,
    /// Complete parents with incomplete children
    pub parent_child_consistency_issues: Vec<String>,
    /// Next pointers that do not resolve
    pub next_pointer_issues: Vec<String>,
}

impl DoctorReport {
    /// Whether any consistency issue should fail an automated check
    pub fn has_issues(&self) -> bool {
        !self.dependency_violations.is_empty()
            || !self.parent_child_consistency_issues.is_empty()
            || !self.next_pointer_issues.is_empty()
    }
}

/// Compute the doctor report for a manifest
pub fn doctor_report(manifest: &RoadmapManifest) -> DoctorReport {
    let sections = &manifest.sections;
    let lookup = by_id(manifest);

    let summary = DoctorSummary {
        total_sections: sections.len(),
        completed: sections
            .iter()
            .filter(|s| s.status == SectionStatus::Complete)
            .count(),
        in_progress: sections
            .iter()
            .filter(|s| s.status == SectionStatus::InProgress)
            .count(),
        blocked: sections
            .iter()
            .filter(|s| {
                s.status == SectionStatus::Blocked || s.status == SectionStatus::RegressionBlocked
            })
            .count(),
        not_started: sections
            .iter()
            .filter(|s| s.status == SectionStatus::NotStarted)
            .count(),
    };

    let mut blockers_by_section = BTreeMap::new();
    for section in sections {
        let blockers = find_blockers(manifest, &section.id);
        if !blockers.is_empty() {
            blockers_by_section.insert(section.id.clone(), blockers);
        }
    }

    let mut dependency_violations = Vec::new();
    for section in sections {
        if section.status == SectionStatus::InProgress || section.status == SectionStatus::Complete {
            for dep_id in &section.dependencies {
                let dep_status = lookup.get(dep_id.as_str()).map(|d| d.status);
                if dep_status != Some(SectionStatus::Complete) {
                    dependency_violations.push(format!(
                        "Section {} is {} but dependency {} is {}",
                        section.id,
                        section.status.name(),
                        dep_id,
                        dep_status.map(|s| s.name()).unwrap_or("missing")
                    ));
                }
            }
        }
    }

    let mut parent_child_consistency_issues = Vec::new();
    for parent in sections {
        let children: Vec<&Section> = sections
            .iter()
            .filter(|s| s.parent_id.as_deref() == Some(parent.id.as_str()))
            .collect();
        if children.is_empty() {
            continue;
        }
        if parent.status == SectionStatus::Complete
            && children.iter().any(|c| c.status != SectionStatus::Complete)
        {
            parent_child_consistency_issues.push(format!(
                "Parent {} is complete while child sections are incomplete.",
                parent.id
            ));
        }
    }

    let mut next_pointer_issues = Vec::new();
    for section in sections {
        if let Some(next_id) = &section.next_section_id {
            if !lookup.contains_key(next_id.as_str()) {
                next_pointer_issues.push(format!(
                    "Section {} points to missing next_section_id {}",
                    section.id, next_id
                ));
            }
        }
    }

    let ready_now = sections
        .iter()
        .filter(|s| s.status != SectionStatus::Complete)
        .filter(|s| {
            s.dependencies.iter().all(|d| {
                lookup
                    .get(d.as_str())
                    .map(|dep| dep.status == SectionStatus::Complete)
                    .unwrap_or(false)
            })
        })
        .map(|s| s.id.clone())
        .collect();

    DoctorReport {
        generated_at: Utc::now().to_rfc3339(),
        summary,
        ready_now,
        blockers_by_section,
        dependency_violations,
        parent_child_consistency_issues,
        next_pointer_issues,
    }
}
