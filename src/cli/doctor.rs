//! `doctor` command: full roadmap health report
//!
//! Exits 2 when the report contains consistency issues, so pipelines can
//! distinguish "unhealthy roadmap" from "invalid manifest" (exit 1).

use crate::cli::load::load_roadmap;
use crate::report::{doctor_report, DoctorReport};
use crate::validator::validate_manifest;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

fn print_report(report: &DoctorReport) {
    println!("🩺 Manifest Doctor Report");
    println!("Generated: {}", report.generated_at);
    println!();
    println!("Summary:");
    println!("- Total sections: {}", report.summary.total_sections);
    println!("- Complete: {}", report.summary.completed);
    println!("- In Progress: {}", report.summary.in_progress);
    println!("- Blocked: {}", report.summary.blocked);
    println!("- Not Started: {}", report.summary.not_started);
    println!();

    println!("Ready now:");
    if report.ready_now.is_empty() {
        println!("- none");
    } else {
        for id in &report.ready_now {
            println!("- {}", id);
        }
    }
    println!();

    if !report.dependency_violations.is_empty() {
        println!("Dependency violations:");
        for violation in &report.dependency_violations {
            println!("- {}", violation);
        }
        println!();
    }

    if !report.parent_child_consistency_issues.is_empty() {
        println!("Parent-child consistency issues:");
        for issue in &report.parent_child_consistency_issues {
            println!("- {}", issue);
        }
        println!();
    }

    if !report.next_pointer_issues.is_empty() {
        println!("Next pointer issues:");
        for issue in &report.next_pointer_issues {
            println!("- {}", issue);
        }
        println!();
    }

    println!("Blockers by section:");
    if report.blockers_by_section.is_empty() {
        println!("- none");
    } else {
        for (section_id, blockers) in &report.blockers_by_section {
            println!("- {}", section_id);
            for blocker in blockers {
                println!("  - {}", blocker);
            }
        }
    }
}

pub fn run(manifest_path: &Path, json: bool) -> Result<()> {
    let manifest = load_roadmap(manifest_path)?;
    let validation = validate_manifest(&manifest);

    if !validation.ok {
        eprintln!("{}", "❌ Manifest invalid. Doctor aborted:".red());
        eprintln!("{}", validation.format_issues());
        std::process::exit(1);
    }

    let report = doctor_report(&manifest);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.has_issues() {
        std::process::exit(2);
    }

    Ok(())
}
