//! `topo` command: print the deterministic topological order

use crate::cli::load::load_roadmap;
use crate::validator::assert_valid;
use anyhow::Result;
use std::path::Path;

pub fn run(manifest_path: &Path) -> Result<()> {
    let manifest = load_roadmap(manifest_path)?;
    let order = assert_valid(&manifest)?;
    println!("{}", order.join(" -> "));
    Ok(())
}
