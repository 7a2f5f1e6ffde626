//! `export` command: mermaid graph / markdown brief generation with an
//! optional CI artifact gate.
//!
//! Exit codes: 1 invalid manifest or usage error, 2 CI gate failure,
//! 3 CI gate misuse (wrong format, missing or unloadable artifacts).

use crate::cli::load::{load_artifacts, load_roadmap, write_file_safe};
use crate::models::ArtifactsManifest;
use crate::report::{
    build_artifact_audit, build_markdown_brief, build_mermaid, compute_focused_set, evaluate_ci_gate,
    BriefOptions, MermaidOptions,
};
use crate::validator::assert_valid;
use anyhow::{bail, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to the roadmap manifest (JSON or YAML)
    pub manifest: PathBuf,

    /// Output path (positional alternative to --output)
    pub output_positional: Option<PathBuf>,

    /// Output path
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Focus the export on one section and its neighborhood
    #[arg(long)]
    pub focus: Option<String>,

    /// Neighborhood radius for a focused export
    #[arg(long, default_value_t = 2)]
    pub depth: usize,

    /// Output format: mmd or markdown
    #[arg(long, default_value = "mmd")]
    pub format: String,

    /// Include an artifact audit from this artifacts manifest (markdown only)
    #[arg(long = "with-artifacts")]
    pub with_artifacts: Option<PathBuf>,

    /// Evaluate the CI artifact gate after writing the brief
    #[arg(long)]
    pub ci: bool,

    /// Minimum per-section artifact completeness for the CI gate
    #[arg(long = "ci-threshold", default_value_t = 100)]
    pub ci_threshold: u32,

    /// Fail the CI gate on artifact warnings as well
    #[arg(long = "ci-strict")]
    pub ci_strict: bool,

    /// Also write the CI gate verdict as JSON to this path
    #[arg(long = "ci-json")]
    pub ci_json: Option<PathBuf>,
}

pub fn run(args: &ExportArgs) -> Result<()> {
    let format = args.format.to_lowercase();
    let is_markdown = format == "markdown" || format == "md";
    if !matches!(format.as_str(), "mmd" | "markdown" | "md") {
        bail!("Invalid --format value: {}. Use mmd or markdown.", format);
    }
    if args.ci_threshold > 100 {
        bail!(
            "Invalid --ci-threshold value: {}. Must be between 0 and 100.",
            args.ci_threshold
        );
    }

    let manifest = load_roadmap(&args.manifest)?;
    assert_valid(&manifest)?;

    let include_ids: HashSet<String> = match &args.focus {
        Some(focus) => compute_focused_set(&manifest, focus, args.depth)?,
        None => manifest.sections.iter().map(|s| s.id.clone()).collect(),
    };

    let mut artifacts: Option<ArtifactsManifest> = None;
    let mut artifacts_warning: Option<String> = None;
    if let Some(artifacts_path) = &args.with_artifacts {
        match load_artifacts(artifacts_path) {
            Ok(loaded) => {
                if loaded.project_id != manifest.project_type {
                    artifacts_warning = Some(format!(
                        "Artifacts project_id \"{}\" differs from sections project_type \"{}\". \
                         Audit may still be usable; verify your mapping convention.",
                        loaded.project_id, manifest.project_type
                    ));
                }
                artifacts = Some(loaded);
            }
            Err(err) => {
                artifacts_warning = Some(format!(
                    "Could not load artifacts manifest \"{}\": {}",
                    artifacts_path.display(),
                    err
                ));
            }
        }
    }

    let out_path = args
        .output
        .clone()
        .or_else(|| args.output_positional.clone())
        .unwrap_or_else(|| default_output_path(is_markdown, args.focus.as_deref()));

    let content = if is_markdown {
        build_markdown_brief(
            &manifest,
            &BriefOptions {
                focus_id: args.focus.clone(),
                depth: args.depth,
                include_ids: include_ids.clone(),
                artifacts: artifacts.as_ref(),
                artifacts_path: args
                    .with_artifacts
                    .as_ref()
                    .map(|p| p.display().to_string()),
                artifacts_warning: artifacts_warning.clone(),
            },
        )?
    } else {
        build_mermaid(
            &manifest,
            &MermaidOptions {
                focus_id: args.focus.clone(),
                depth: Some(args.depth),
                include_ids: Some(include_ids.clone()),
            },
        )?
    };

    let abs = write_file_safe(&out_path, &content)?;
    let kind = if is_markdown {
        "Markdown brief"
    } else {
        "Mermaid graph"
    };
    println!(
        "{}",
        format!("✅ {} written: {}", kind, abs.display()).green()
    );
    if let Some(focus) = &args.focus {
        println!("Focused view: section {}, depth {}", focus, args.depth);
    }
    if !is_markdown && args.with_artifacts.is_some() {
        println!("ℹ️ --with-artifacts is only applied to --format markdown.");
    }
    if let Some(warning) = &artifacts_warning {
        println!("{}", format!("⚠️ {}", warning).yellow());
    }

    if args.ci {
        if !is_markdown {
            eprintln!("{}", "❌ CI gate requires --format markdown.".red());
            std::process::exit(3);
        }
        if args.with_artifacts.is_none() {
            eprintln!("{}", "❌ CI gate requires --with-artifacts <path>.".red());
            std::process::exit(3);
        }
        let Some(artifacts) = artifacts.as_ref() else {
            eprintln!("{}", "❌ CI gate could not load artifacts manifest.".red());
            if let Some(warning) = &artifacts_warning {
                eprintln!("Reason: {}", warning);
            }
            std::process::exit(3);
        };

        let audit = build_artifact_audit(&manifest, artifacts, &include_ids);
        let gate = evaluate_ci_gate(
            &audit,
            args.ci_threshold,
            artifacts_warning.as_deref(),
            args.ci_strict,
        );

        if let Some(ci_json_path) = &args.ci_json {
            let payload = json!({
                "generated_at": Utc::now().to_rfc3339(),
                "focus": args.focus,
                "depth": args.depth,
                "format": "markdown",
                "threshold": args.ci_threshold,
                "strict_warning": args.ci_strict,
                "warning": artifacts_warning,
                "audit_summary": audit.summary,
                "failing_sections": gate.failing_sections,
                "pass": gate.pass,
                "reasons": gate.reasons,
            });
            let json_abs = write_file_safe(ci_json_path, &serde_json::to_string_pretty(&payload)?)?;
            println!("🧾 CI JSON report written: {}", json_abs.display());
        }

        if !gate.pass {
            eprintln!("{}", "❌ CI artifact gate failed.".red());
            for reason in &gate.reasons {
                eprintln!("- {}", reason);
            }
            eprintln!("Failing sections:");
            for failing in &gate.failing_sections {
                let missing = if failing.missing_required_types.is_empty() {
                    "-".to_string()
                } else {
                    failing.missing_required_types.join(", ")
                };
                eprintln!(
                    "- {}: completeness={}%, missing=[{}]",
                    failing.section_id, failing.completeness, missing
                );
            }
            std::process::exit(2);
        }

        println!(
            "{}",
            format!("✅ CI artifact gate passed (threshold {}%).", args.ci_threshold).green()
        );
    }

    Ok(())
}

fn default_output_path(is_markdown: bool, focus: Option<&str>) -> PathBuf {
    let name = match (is_markdown, focus) {
        (true, Some(focus)) => format!("docs/brief_{}.md", focus.replace('.', "_")),
        (true, None) => "docs/brief_full.md".to_string(),
        (false, Some(focus)) => format!("docs/sections_graph_{}.mmd", focus.replace('.', "_")),
        (false, None) => "docs/sections_graph.mmd".to_string(),
    };
    PathBuf::from(name)
}
