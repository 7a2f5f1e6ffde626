//! Structural validation of roadmap manifests
//!
//! Proves that a manifest describes a well-formed, acyclic, fully-referenced
//! section graph before anything is allowed to act on it. Every check runs
//! and every issue is accumulated; the validator never stops at the first
//! failure.

use crate::models::{Issue, IssueCode, RoadmapManifest, Section, ValidationReport};
use anyhow::{bail, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

const SECTION_ID_PATTERN: &str = r"^\d+\.\d+$";
const CHECKLIST_ID_PATTERN: &str = r"^\d+\.\d+\.c\d+$";

/// Validate a roadmap manifest, accumulating every structural issue.
///
/// The returned report carries the topological order and the dependency
/// graph as side products so callers never need to recompute them.
pub fn validate_manifest(manifest: &RoadmapManifest) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let sections = &manifest.sections;
    let ids: Vec<String> = sections.iter().map(|s| s.id.clone()).collect();

    // Patterns are compile-time constants; construction cannot fail.
    let section_id_re = Regex::new(SECTION_ID_PATTERN).unwrap();
    let checklist_id_re = Regex::new(CHECKLIST_ID_PATTERN).unwrap();

    let mut by_id: HashMap<&str, &Section> = HashMap::new();
    let mut dependency_graph: BTreeMap<String, Vec<String>> = BTreeMap::new();

    {
        let mut seen: HashSet<&str> = HashSet::new();

        for section in sections {
            if !section_id_re.is_match(&section.id) {
                errors.push(Issue::error(
                    IssueCode::InvalidIdFormat,
                    Some(section.id.clone()),
                    format!(
                        "Section id \"{}\" must match pattern N.N (e.g., 2.4).",
                        section.id
                    ),
                ));
            }

            if !seen.insert(section.id.as_str()) {
                errors.push(Issue::error(
                    IssueCode::DuplicateId,
                    Some(section.id.clone()),
                    format!("Duplicate section id \"{}\".", section.id),
                ));
            }

            by_id.insert(section.id.as_str(), section);
            dependency_graph.insert(section.id.clone(), section.dependencies.clone());
        }
    }

    for section in sections {
        if section.level == 1 && section.parent_id.is_some() {
            errors.push(Issue::error(
                IssueCode::RootWithParent,
                Some(section.id.clone()),
                format!("Level 1 section \"{}\" must have no parent_id.", section.id),
            ));
        }

        if section.level > 1 && section.parent_id.is_none() {
            errors.push(Issue::error(
                IssueCode::NonRootWithoutParent,
                Some(section.id.clone()),
                format!("Non-root section \"{}\" must have a parent_id.", section.id),
            ));
        }

        if let Some(parent_id) = &section.parent_id {
            match by_id.get(parent_id.as_str()) {
                None => {
                    errors.push(Issue::error(
                        IssueCode::MissingParent,
                        Some(section.id.clone()),
                        format!(
                            "Section \"{}\" references missing parent \"{}\".",
                            section.id, parent_id
                        ),
                    ));
                }
                Some(parent) if section.level <= parent.level => {
                    errors.push(Issue::error(
                        IssueCode::InvalidParentLevel,
                        Some(section.id.clone()),
                        format!(
                            "Section \"{}\" level ({}) must be greater than parent \"{}\" level ({}).",
                            section.id, section.level, parent.id, parent.level
                        ),
                    ));
                }
                Some(_) => {}
            }
        }

        for item in &section.checklist {
            if !checklist_id_re.is_match(&item.id) {
                errors.push(Issue::error(
                    IssueCode::InvalidChecklistId,
                    Some(section.id.clone()),
                    format!(
                        "Checklist id \"{}\" must match pattern N.N.cN (e.g., 2.4.c1).",
                        item.id
                    ),
                ));
            }
        }
    }

    for section in sections {
        for dep in &section.dependencies {
            if dep == &section.id {
                errors.push(Issue::error(
                    IssueCode::SelfDependency,
                    Some(section.id.clone()),
                    format!("Section \"{}\" cannot depend on itself.", section.id),
                ));
            }

            if !by_id.contains_key(dep.as_str()) {
                errors.push(Issue::error(
                    IssueCode::MissingDependency,
                    Some(section.id.clone()),
                    format!(
                        "Section \"{}\" references missing dependency \"{}\".",
                        section.id, dep
                    ),
                ));
            }
        }

        if let Some(next_id) = &section.next_section_id {
            if !by_id.contains_key(next_id.as_str()) {
                errors.push(Issue::error(
                    IssueCode::MissingNextSection,
                    Some(section.id.clone()),
                    format!(
                        "Section \"{}\" references missing next_section_id \"{}\".",
                        section.id, next_id
                    ),
                ));
            }
        }
    }

    let (topo_order, has_cycle) = topo_sort(&ids, &dependency_graph);
    if has_cycle {
        errors.push(Issue::error(
            IssueCode::CycleDetected,
            None,
            "Dependency graph contains one or more cycles.",
        ));
    }

    // Reported in addition to MISSING_PARENT: structural vs navigational
    // audiences consume the two codes separately.
    for section in sections {
        if let Some(parent_id) = &section.parent_id {
            if !by_id.contains_key(parent_id.as_str()) {
                errors.push(Issue::error(
                    IssueCode::OrphanChildLink,
                    Some(section.id.clone()),
                    format!(
                        "Section \"{}\" has orphan parent reference \"{}\".",
                        section.id, parent_id
                    ),
                ));
            }
        }
    }

    let roots: Vec<&str> = sections
        .iter()
        .filter(|s| s.level == 1)
        .map(|s| s.id.as_str())
        .collect();
    for unreachable in find_unreachable_sections(sections, &dependency_graph, &roots) {
        warnings.push(Issue::warning(
            IssueCode::UnreachableSection,
            Some(unreachable.clone()),
            format!(
                "Section \"{}\" appears unreachable from root traversal (deps/children/next links).",
                unreachable
            ),
        ));
    }

    ValidationReport {
        ok: errors.is_empty(),
        errors,
        warnings,
        topo_order,
        dependency_graph,
    }
}

/// Validate and return the topological order, or an error listing every issue
pub fn assert_valid(manifest: &RoadmapManifest) -> Result<Vec<String>> {
    let report = validate_manifest(manifest);
    if !report.ok {
        let lines: Vec<String> = report.errors.iter().map(|e| format!("- {}", e.format())).collect();
        bail!("Invalid roadmap manifest:\n{}", lines.join("\n"));
    }
    Ok(report.topo_order)
}

/// Kahn's algorithm over the dependency graph.
///
/// An edge `dep -> node` exists for every declared dependency. The ready set
/// is drained in ascending lexical id order so the emitted order is
/// deterministic. Returns the order and whether a cycle was detected (fewer
/// nodes emitted than exist).
fn topo_sort(ids: &[String], dep_graph: &BTreeMap<String, Vec<String>>) -> (Vec<String>, bool) {
    let mut in_degree: HashMap<&str, usize> = HashMap::new();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();

    for id in ids {
        in_degree.insert(id.as_str(), 0);
        dependents.insert(id.as_str(), Vec::new());
    }

    for node in ids {
        for dep in dep_graph.get(node.as_str()).map(Vec::as_slice).unwrap_or_default() {
            // Edges to unknown nodes are already reported as MISSING_DEPENDENCY.
            if !in_degree.contains_key(dep.as_str()) {
                continue;
            }
            *in_degree.get_mut(node.as_str()).unwrap() += 1;
            dependents.get_mut(dep.as_str()).unwrap().push(node.as_str());
        }
    }

    let mut ready: BTreeSet<&str> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();
    let mut order = Vec::new();

    while let Some(node) = ready.iter().next().copied() {
        ready.remove(node);
        order.push(node.to_string());

        for &dependent in &dependents[node] {
            let degree = in_degree.get_mut(dependent).unwrap();
            *degree -= 1;
            if *degree == 0 {
                ready.insert(dependent);
            }
        }
    }

    let has_cycle = order.len() != ids.len();
    (order, has_cycle)
}

/// Walk from the level-1 roots along child links, dependent links, and next
/// pointers; anything never visited is a likely modeling mistake (an island
/// with no path from any root).
fn find_unreachable_sections(
    sections: &[Section],
    dep_graph: &BTreeMap<String, Vec<String>>,
    roots: &[&str],
) -> Vec<String> {
    let by_id: HashMap<&str, &Section> = sections.iter().map(|s| (s.id.as_str(), s)).collect();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut children: HashMap<&str, Vec<&str>> = HashMap::new();

    for section in sections {
        dependents.insert(section.id.as_str(), Vec::new());
        children.insert(section.id.as_str(), Vec::new());
    }

    for section in sections {
        for dep in dep_graph.get(section.id.as_str()).map(Vec::as_slice).unwrap_or_default() {
            if let Some(entry) = dependents.get_mut(dep.as_str()) {
                entry.push(section.id.as_str());
            }
        }
        if let Some(parent_id) = &section.parent_id {
            if let Some(entry) = children.get_mut(parent_id.as_str()) {
                entry.push(section.id.as_str());
            }
        }
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut stack: Vec<&str> = roots.to_vec();

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }

        for &next in dependents.get(current).map(Vec::as_slice).unwrap_or_default() {
            stack.push(next);
        }

        for &child in children.get(current).map(Vec::as_slice).unwrap_or_default() {
            stack.push(child);
        }

        if let Some(next_id) = by_id.get(current).and_then(|s| s.next_section_id.as_deref()) {
            stack.push(next_id);
        }
    }

    sections
        .iter()
        .filter(|s| !visited.contains(s.id.as_str()))
        .map(|s| s.id.clone())
        .collect()
}
