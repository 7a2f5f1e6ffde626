//! `validate` command: structural validation of a roadmap manifest

use crate::cli::load::load_roadmap;
use crate::validator::validate_manifest;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn run(manifest_path: &Path, json: bool) -> Result<()> {
    let manifest = load_roadmap(manifest_path)?;
    let report = validate_manifest(&manifest);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        if !report.ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    if !report.ok {
        eprintln!("{}", "❌ Manifest invalid:".red());
        for issue in &report.errors {
            eprintln!("- {}", issue.format());
        }
        if !report.warnings.is_empty() {
            eprintln!();
            eprintln!("Warnings:");
            for issue in &report.warnings {
                eprintln!("- {}", issue.format());
            }
        }
        std::process::exit(1);
    }

    println!("{}", "✅ Manifest valid.".green());
    if !report.warnings.is_empty() {
        println!("Warnings:");
        for issue in &report.warnings {
            println!("- {}", issue.format());
        }
    }

    Ok(())
}
