//! Markdown milestone brief
//!
//! Renders a self-contained onboarding document for a roadmap scope: the
//! mermaid graph, status summary, ready-now list, section and blocker
//! tables, and (when an artifacts manifest is supplied) the artifact audit.

use crate::models::{ArtifactsManifest, RoadmapManifest, Section};
use crate::report::audit::build_artifact_audit;
use crate::report::doctor::{doctor_report, find_blockers};
use crate::report::mermaid::{build_mermaid, MermaidOptions};
use anyhow::Result;
use chrono::Utc;
use std::collections::{HashMap, HashSet};

/// Options controlling brief generation
#[derive(Debug, Clone, Default)]
pub struct BriefOptions<'a> {
    pub focus_id: Option<String>,
    pub depth: usize,
    /// Sections included in the brief scope
    pub include_ids: HashSet<String>,
    pub artifacts: Option<&'a ArtifactsManifest>,
    /// Display path of the artifacts manifest
    pub artifacts_path: Option<String>,
    /// Non-fatal artifact warning, rendered as a blockquote
    pub artifacts_warning: Option<String>,
}

fn escape_md(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

fn join_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}

/// Render the markdown brief for the given scope
pub fn build_markdown_brief(manifest: &RoadmapManifest, options: &BriefOptions<'_>) -> Result<String> {
    let by_id: HashMap<&str, &Section> = manifest
        .sections
        .iter()
        .map(|s| (s.id.as_str(), s))
        .collect();
    let doctor = doctor_report(manifest);

    let mut included: Vec<&Section> = manifest
        .sections
        .iter()
        .filter(|s| options.include_ids.contains(&s.id))
        .collect();
    included.sort_by(|a, b| a.id.cmp(&b.id));

    let mermaid = build_mermaid(
        manifest,
        &MermaidOptions {
            focus_id: options.focus_id.clone(),
            depth: Some(options.depth),
            include_ids: Some(options.include_ids.clone()),
        },
    )?;

    let mut lines: Vec<String> = Vec::new();
    match &options.focus_id {
        Some(focus) => lines.push(format!("# Milestone Brief: {}", focus)),
        None => lines.push("# Milestone Brief".to_string()),
    }
    lines.push(String::new());
    lines.push(format!("- Generated: {}", Utc::now().to_rfc3339()));
    lines.push(format!("- Engine target: {}", manifest.engine_target));
    lines.push(format!("- Project type: {}", manifest.project_type));
    lines.push(format!(
        "- Focus: {}",
        options.focus_id.as_deref().unwrap_or("full roadmap")
    ));
    lines.push(format!("- Depth: {}", options.depth));
    if let Some(path) = &options.artifacts_path {
        lines.push(format!("- Artifacts source: {}", path));
    }
    lines.push(String::new());

    if let Some(warning) = &options.artifacts_warning {
        lines.push("> ⚠️ Artifact manifest warning".to_string());
        lines.push(">".to_string());
        lines.push(format!("> {}", warning));
        lines.push(String::new());
    }

    lines.push("## Graph".to_string());
    lines.push(String::new());
    lines.push("```mermaid".to_string());
    lines.push(mermaid);
    lines.push("```".to_string());
    lines.push(String::new());

    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push(format!(
        "- Total sections in manifest: **{}**",
        doctor.summary.total_sections
    ));
    lines.push(format!("- Included in this brief: **{}**", included.len()));
    lines.push(format!("- Complete: **{}**", doctor.summary.completed));
    lines.push(format!("- In progress: **{}**", doctor.summary.in_progress));
    lines.push(format!("- Blocked: **{}**", doctor.summary.blocked));
    lines.push(format!("- Not started: **{}**", doctor.summary.not_started));
    lines.push(String::new());

    let ready_included: Vec<&String> = doctor
        .ready_now
        .iter()
        .filter(|id| options.include_ids.contains(*id))
        .collect();
    lines.push("## Ready Now (included scope)".to_string());
    lines.push(String::new());
    if ready_included.is_empty() {
        lines.push("- None".to_string());
    } else {
        for id in ready_included {
            let title = by_id.get(id.as_str()).map(|s| s.title.as_str()).unwrap_or("");
            lines.push(format!("- {} {}", id, title));
        }
    }
    lines.push(String::new());

    lines.push("## Included Sections".to_string());
    lines.push(String::new());
    lines.push("| ID | Title | Status | Parent | Dependencies | Next |".to_string());
    lines.push("|---|---|---|---|---|---|".to_string());
    for section in &included {
        lines.push(format!(
            "| {} | {} | {} | {} | {} | {} |",
            section.id,
            escape_md(&section.title),
            section.status.name(),
            section.parent_id.as_deref().unwrap_or("-"),
            join_or_dash(&section.dependencies),
            section.next_section_id.as_deref().unwrap_or("-")
        ));
    }
    lines.push(String::new());

    lines.push("## Blockers (included scope)".to_string());
    lines.push(String::new());
    lines.push("| Section | Blocker |".to_string());
    lines.push("|---|---|".to_string());
    let mut blocker_count = 0;
    for section in &included {
        for blocker in find_blockers(manifest, &section.id) {
            blocker_count += 1;
            lines.push(format!("| {} | {} |", section.id, escape_md(&blocker)));
        }
    }
    if blocker_count == 0 {
        lines.push("| - | No blockers detected in included scope |".to_string());
    }
    lines.push(String::new());

    if let Some(artifacts) = options.artifacts {
        let audit = build_artifact_audit(manifest, artifacts, &options.include_ids);

        lines.push("## Artifact Completeness Summary".to_string());
        lines.push(String::new());
        lines.push(format!(
            "- Included sections audited: **{}**",
            audit.summary.included_sections
        ));
        lines.push(format!(
            "- Sections with all required final artifacts: **{}**",
            audit.summary.all_required_final
        ));
        lines.push(format!(
            "- Missing required artifact entries: **{}**",
            audit.summary.missing_required_total
        ));
        lines.push(format!(
            "- Final artifacts in scope: **{}**",
            audit.summary.final_artifacts_total
        ));
        lines.push(String::new());

        lines.push("## Artifact Status by Section".to_string());
        lines.push(String::new());
        lines.push(
            "| Section | Required Types | Final Types Present | Missing Required Types | Final/Total | Completeness |"
                .to_string(),
        );
        lines.push("|---|---|---|---|---|---|".to_string());
        for row in &audit.rows {
            lines.push(format!(
                "| {} | {} | {} | {} | {}/{} | {}% |",
                row.section_id,
                escape_md(&join_or_dash(&row.required_types)),
                escape_md(&join_or_dash(&row.present_final_types)),
                escape_md(&join_or_dash(&row.missing_types)),
                row.final_count,
                row.total_count,
                row.completeness
            ));
        }
        lines.push(String::new());
    }

    lines.push("## Onboarding Notes".to_string());
    lines.push(String::new());
    lines.push("1. Start with **Ready Now** sections first.".to_string());
    lines.push("2. Clear blockers before opening new in-progress branches.".to_string());
    lines.push(
        "3. Keep minimum artifact coverage per section (task packet, check report, memory entry)."
            .to_string(),
    );
    lines.push(String::new());

    Ok(lines.join("\n"))
}
