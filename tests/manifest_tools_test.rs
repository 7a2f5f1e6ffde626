//! Integration tests for manifest tooling
//!
//! Exercises the file-facing layer end to end: loading manifests from disk,
//! structural validation with stable issue codes, schema linting, and
//! export artifacts (mermaid graph, markdown brief, CI gate).

use roadmapd::cli::load::{load_artifacts, load_roadmap, write_file_safe};
use roadmapd::report::{
    build_artifact_audit, build_markdown_brief, build_mermaid, evaluate_ci_gate, BriefOptions,
    MermaidOptions,
};
use roadmapd::validator::{assert_valid, validate_manifest, DocumentType, SchemaValidator};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

const VALID_MANIFEST: &str = r#"{
    "manifest_version": "1.0",
    "project_type": "game_vertical_slice",
    "engine_target": "godot",
    "sections": [
        {
            "id": "1.0",
            "title": "Foundation",
            "level": 1,
            "parent_id": null,
            "status": "complete",
            "goal": "Foundation milestone",
            "dependencies": [],
            "required_artifact_types": [],
            "checklist": [],
            "next_section_id": null
        },
        {
            "id": "2.0",
            "title": "Content",
            "level": 1,
            "parent_id": null,
            "status": "not_started",
            "goal": "Content milestone",
            "dependencies": ["1.0"],
            "required_artifact_types": ["task_packet"],
            "checklist": [],
            "next_section_id": null
        }
    ]
}"#;

const BROKEN_MANIFEST: &str = r#"{
    "manifest_version": "1.0",
    "project_type": "demo",
    "engine_target": "demo",
    "sections": [
        {
            "id": "1.0",
            "title": "A",
            "level": 1,
            "parent_id": null,
            "status": "not_started",
            "goal": "A",
            "dependencies": ["2.0"],
            "required_artifact_types": [],
            "checklist": [],
            "next_section_id": null
        },
        {
            "id": "2.0",
            "title": "B",
            "level": 1,
            "parent_id": null,
            "status": "not_started",
            "goal": "B",
            "dependencies": ["1.0", "2.0", "9.9"],
            "required_artifact_types": [],
            "checklist": [],
            "next_section_id": null
        }
    ]
}"#;

const ARTIFACTS_MANIFEST: &str = r#"{
    "manifest_version": "1.0",
    "project_id": "game_vertical_slice",
    "artifact_types": ["task_packet", "check_report"],
    "artifacts": [
        {
            "artifact_id": "a1",
            "project_id": "game_vertical_slice",
            "section_id": "2.0",
            "task_id": "t1",
            "producer_agent": "builder",
            "artifact_type": "task_packet",
            "title": "Content task packet",
            "status": "draft",
            "created_at": "2026-08-01T00:00:00Z"
        }
    ]
}"#;

#[test]
fn test_load_and_validate_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("roadmap.json");
    fs::write(&path, VALID_MANIFEST).unwrap();

    let manifest = load_roadmap(&path).unwrap();
    let order = assert_valid(&manifest).unwrap();
    assert_eq!(order, vec!["1.0", "2.0"]);
}

#[test]
fn test_broken_manifest_accumulates_all_issues() {
    let manifest = serde_json::from_str(BROKEN_MANIFEST).unwrap();
    let report = validate_manifest(&manifest);

    assert!(!report.ok);
    let codes: Vec<&str> = report.errors.iter().map(|e| e.code.as_str()).collect();
    assert!(codes.contains(&"CYCLE_DETECTED"));
    assert!(codes.contains(&"SELF_DEPENDENCY"));
    assert!(codes.contains(&"MISSING_DEPENDENCY"));

    let err = assert_valid(&manifest).unwrap_err();
    assert!(err.to_string().contains("Invalid roadmap manifest"));
    assert!(err.to_string().contains("[SELF_DEPENDENCY]"));
}

#[test]
fn test_schema_lint_catches_shape_errors_before_validation() {
    let mut validator = SchemaValidator::new();

    let good: serde_json::Value = serde_json::from_str(VALID_MANIFEST).unwrap();
    assert!(validator
        .validate(DocumentType::Roadmap, &good)
        .unwrap()
        .is_empty());

    let bad: serde_json::Value =
        serde_json::from_str(r#"{ "manifest_version": "1.0", "sections": "nope" }"#).unwrap();
    let violations = validator.validate(DocumentType::Roadmap, &bad).unwrap();
    assert!(!violations.is_empty());
}

#[test]
fn test_mermaid_export_writes_expected_graph() {
    let dir = TempDir::new().unwrap();
    let manifest = serde_json::from_str(VALID_MANIFEST).unwrap();

    let graph = build_mermaid(&manifest, &MermaidOptions::default()).unwrap();
    let out = dir.path().join("docs/sections_graph.mmd");
    write_file_safe(&out, &graph).unwrap();

    let written = fs::read_to_string(&out).unwrap();
    assert!(written.starts_with("flowchart TD"));
    assert!(written.contains("S_1_0 -. dep .-> S_2_0:::dependency"));
    assert!(written.contains("class S_1_0 complete;"));
}

#[test]
fn test_brief_with_artifacts_audit_and_ci_gate() {
    let dir = TempDir::new().unwrap();
    let artifacts_path = dir.path().join("artifacts.json");
    fs::write(&artifacts_path, ARTIFACTS_MANIFEST).unwrap();

    let manifest: roadmapd::RoadmapManifest = serde_json::from_str(VALID_MANIFEST).unwrap();
    let artifacts = load_artifacts(&artifacts_path).unwrap();
    let include_ids: HashSet<String> = manifest.sections.iter().map(|s| s.id.clone()).collect();

    let brief = build_markdown_brief(
        &manifest,
        &BriefOptions {
            depth: 2,
            include_ids: include_ids.clone(),
            artifacts: Some(&artifacts),
            artifacts_path: Some(artifacts_path.display().to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    // Draft artifact does not satisfy the required type
    assert!(brief.contains("## Artifact Status by Section"));
    assert!(brief.contains("| 2.0 | task_packet | - | task_packet | 0/1 | 0% |"));

    let audit = build_artifact_audit(&manifest, &artifacts, &include_ids);
    assert_eq!(audit.summary.missing_required_total, 1);

    let gate = evaluate_ci_gate(&audit, 100, None, false);
    assert!(!gate.pass);
    assert_eq!(gate.failing_sections[0].section_id, "2.0");
}

#[test]
fn test_yaml_manifest_round_trips_through_loader() {
    let dir = TempDir::new().unwrap();
    let manifest: roadmapd::RoadmapManifest = serde_json::from_str(VALID_MANIFEST).unwrap();

    let yaml_path = dir.path().join("roadmap.yaml");
    fs::write(&yaml_path, serde_yaml::to_string(&manifest).unwrap()).unwrap();

    let reloaded = load_roadmap(&yaml_path).unwrap();
    assert_eq!(reloaded.sections.len(), 2);
    assert!(validate_manifest(&reloaded).ok);
}
