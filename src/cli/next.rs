//! `next` command: suggest where to work after a section

use crate::cli::load::load_roadmap;
use crate::report::next_section;
use crate::validator::assert_valid;
use anyhow::Result;
use std::path::Path;

pub fn run(manifest_path: &Path, section_id: &str) -> Result<()> {
    let manifest = load_roadmap(manifest_path)?;
    assert_valid(&manifest)?;
    println!("{}", next_section(&manifest, section_id));
    Ok(())
}
