//! Mermaid graph export
//!
//! Renders the section graph as a `flowchart TD`: hierarchy edges, dashed
//! dependency edges, and labeled next-pointer edges, with one status class
//! per node. A focused view limits the graph to the breadth-first
//! neighborhood of one section.

use crate::models::{RoadmapManifest, Section, SectionStatus};
use anyhow::{bail, Result};
use std::collections::{HashMap, HashSet, VecDeque};

/// Options controlling graph rendering
#[derive(Debug, Clone, Default)]
pub struct MermaidOptions {
    /// Highlight this section and, when `include_ids` is unset, restrict the
    /// graph to its neighborhood
    pub focus_id: Option<String>,
    /// Neighborhood radius for a focused view
    pub depth: Option<usize>,
    /// Explicit set of section ids to include; overrides focus-based scoping
    pub include_ids: Option<HashSet<String>>,
}

fn node_id(section_id: &str) -> String {
    format!("S_{}", section_id.replace('.', "_"))
}

fn status_class(status: SectionStatus) -> &'static str {
    match status {
        SectionStatus::Complete => "complete",
        SectionStatus::InProgress => "inprogress",
        SectionStatus::Blocked | SectionStatus::RegressionBlocked => "blocked",
        SectionStatus::NotStarted => "notstarted",
    }
}

struct Adjacency<'a> {
    by_id: HashMap<&'a str, &'a Section>,
    children: HashMap<&'a str, Vec<&'a str>>,
    dependents: HashMap<&'a str, Vec<&'a str>>,
    prev_pointers: HashMap<&'a str, Vec<&'a str>>,
}

fn build_adjacency(manifest: &RoadmapManifest) -> Adjacency<'_> {
    let by_id: HashMap<&str, &Section> = manifest
        .sections
        .iter()
        .map(|s| (s.id.as_str(), s))
        .collect();

    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut prev_pointers: HashMap<&str, Vec<&str>> = HashMap::new();

    for section in &manifest.sections {
        children.insert(section.id.as_str(), Vec::new());
        dependents.insert(section.id.as_str(), Vec::new());
        prev_pointers.insert(section.id.as_str(), Vec::new());
    }

    for section in &manifest.sections {
        if let Some(parent_id) = &section.parent_id {
            if let Some(entry) = children.get_mut(parent_id.as_str()) {
                entry.push(section.id.as_str());
            }
        }
        for dep in &section.dependencies {
            if let Some(entry) = dependents.get_mut(dep.as_str()) {
                entry.push(section.id.as_str());
            }
        }
        if let Some(next_id) = &section.next_section_id {
            if let Some(entry) = prev_pointers.get_mut(next_id.as_str()) {
                entry.push(section.id.as_str());
            }
        }
    }

    Adjacency {
        by_id,
        children,
        dependents,
        prev_pointers,
    }
}

/// Breadth-limited neighborhood of a focus section, following hierarchy,
/// dependency (both directions), and next-pointer (both directions) links.
pub fn compute_focused_set(
    manifest: &RoadmapManifest,
    focus_id: &str,
    depth: usize,
) -> Result<HashSet<String>> {
    let adjacency = build_adjacency(manifest);
    if !adjacency.by_id.contains_key(focus_id) {
        bail!("Unknown focus section: {}", focus_id);
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();
    queue.push_back((focus_id, 0));

    while let Some((id, d)) = queue.pop_front() {
        if !visited.insert(id) {
            continue;
        }
        if d >= depth {
            continue;
        }

        let section = adjacency.by_id[id];
        let mut neighbors: HashSet<&str> = HashSet::new();

        if let Some(parent_id) = &section.parent_id {
            if adjacency.by_id.contains_key(parent_id.as_str()) {
                neighbors.insert(parent_id.as_str());
            }
        }
        for &child in &adjacency.children[id] {
            neighbors.insert(child);
        }

        for dep in &section.dependencies {
            if adjacency.by_id.contains_key(dep.as_str()) {
                neighbors.insert(dep.as_str());
            }
        }
        for &dependent in &adjacency.dependents[id] {
            neighbors.insert(dependent);
        }

        if let Some(next_id) = &section.next_section_id {
            if adjacency.by_id.contains_key(next_id.as_str()) {
                neighbors.insert(next_id.as_str());
            }
        }
        for &prev in &adjacency.prev_pointers[id] {
            neighbors.insert(prev);
        }

        for neighbor in neighbors {
            queue.push_back((neighbor, d + 1));
        }
    }

    Ok(visited.into_iter().map(String::from).collect())
}

/// Render the manifest as a mermaid flowchart
pub fn build_mermaid(manifest: &RoadmapManifest, options: &MermaidOptions) -> Result<String> {
    let by_id: HashMap<&str, &Section> = manifest
        .sections
        .iter()
        .map(|s| (s.id.as_str(), s))
        .collect();

    let include_ids: Option<HashSet<String>> = match (&options.include_ids, &options.focus_id) {
        (Some(ids), _) => Some(ids.clone()),
        (None, Some(focus)) => Some(compute_focused_set(
            manifest,
            focus,
            options.depth.unwrap_or(2),
        )?),
        (None, None) => None,
    };
    let include = |id: &str| include_ids.as_ref().map(|ids| ids.contains(id)).unwrap_or(true);

    let mut lines = Vec::new();
    lines.push("flowchart TD".to_string());

    for section in &manifest.sections {
        if !include(&section.id) {
            continue;
        }
        let nid = node_id(&section.id);
        let label = format!("{} {}", section.id, section.title).replace('"', "\\\"");
        lines.push(format!("  {}[\"{}\"]", nid, label));
        lines.push(format!("  class {} {};", nid, status_class(section.status)));
        if options.focus_id.as_deref() == Some(section.id.as_str()) {
            lines.push(format!("  class {} focus;", nid));
        }
    }

    for section in &manifest.sections {
        if !include(&section.id) {
            continue;
        }
        if let Some(parent_id) = &section.parent_id {
            if by_id.contains_key(parent_id.as_str()) && include(parent_id) {
                lines.push(format!(
                    "  {} --> {}:::hierarchy",
                    node_id(parent_id),
                    node_id(&section.id)
                ));
            }
        }
    }

    for section in &manifest.sections {
        if !include(&section.id) {
            continue;
        }
        for dep in &section.dependencies {
            if by_id.contains_key(dep.as_str()) && include(dep) {
                lines.push(format!(
                    "  {} -. dep .-> {}:::dependency",
                    node_id(dep),
                    node_id(&section.id)
                ));
            }
        }
    }

    for section in &manifest.sections {
        if !include(&section.id) {
            continue;
        }
        if let Some(next_id) = &section.next_section_id {
            if by_id.contains_key(next_id.as_str()) && include(next_id) {
                lines.push(format!(
                    "  {} -->|next| {}:::nextptr",
                    node_id(&section.id),
                    node_id(next_id)
                ));
            }
        }
    }

    lines.push("  classDef complete fill:#1f6f3f,color:#fff,stroke:#14522d,stroke-width:1px;".to_string());
    lines.push("  classDef inprogress fill:#1f4f8b,color:#fff,stroke:#163a66,stroke-width:1px;".to_string());
    lines.push("  classDef blocked fill:#8b1f2d,color:#fff,stroke:#661621,stroke-width:1px;".to_string());
    lines.push("  classDef notstarted fill:#555,color:#fff,stroke:#333,stroke-width:1px;".to_string());
    lines.push("  classDef dependency stroke-dasharray: 5 5;".to_string());
    lines.push("  classDef nextptr stroke-width:2px;".to_string());
    lines.push("  classDef hierarchy stroke-width:1px;".to_string());
    lines.push("  classDef focus stroke:#ffd166,stroke-width:3px;".to_string());

    Ok(lines.join("\n"))
}
