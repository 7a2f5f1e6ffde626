//! `list-blockers` command: show what is holding a section back

use crate::cli::load::load_roadmap;
use crate::report::find_blockers;
use crate::validator::assert_valid;
use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn run(manifest_path: &Path, section_id: &str) -> Result<()> {
    let manifest = load_roadmap(manifest_path)?;
    assert_valid(&manifest)?;

    let blockers = find_blockers(&manifest, section_id);
    if blockers.is_empty() {
        println!("{}", format!("✅ No blockers for {}", section_id).green());
    } else {
        println!("{}", format!("⛔ Blockers for {}:", section_id).red());
        for blocker in &blockers {
            println!("- {}", blocker);
        }
    }

    Ok(())
}
