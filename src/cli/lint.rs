//! `lint` command: JSON Schema check of a raw manifest document

use crate::cli::load::load_raw;
use crate::validator::{DocumentType, SchemaValidator};
use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use std::path::Path;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LintTarget {
    Roadmap,
    Artifacts,
}

impl From<LintTarget> for DocumentType {
    fn from(target: LintTarget) -> Self {
        match target {
            LintTarget::Roadmap => DocumentType::Roadmap,
            LintTarget::Artifacts => DocumentType::Artifacts,
        }
    }
}

pub fn run(target: LintTarget, manifest_path: &Path) -> Result<()> {
    let doc_type: DocumentType = target.into();
    let data = load_raw(manifest_path)?;

    let mut validator = SchemaValidator::new();
    let violations = validator.validate(doc_type, &data)?;

    if !violations.is_empty() {
        eprintln!(
            "{}",
            format!("❌ {} validation failed.", capitalize(doc_type.name())).red()
        );
        for violation in &violations {
            eprintln!("- {}", violation.format());
        }
        std::process::exit(1);
    }

    println!(
        "{}",
        format!("✅ {} is valid.", capitalize(doc_type.name())).green()
    );
    println!("Manifest: {}", manifest_path.display());

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
