//! Manifest file IO shared by the CLI commands

use crate::models::{ArtifactsManifest, RoadmapManifest};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}

fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if is_yaml(path) {
        serde_yaml::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    } else {
        serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

/// Load a roadmap manifest from JSON or YAML
pub fn load_roadmap(path: &Path) -> Result<RoadmapManifest> {
    load_document(path)
}

/// Load an artifacts manifest from JSON or YAML
pub fn load_artifacts(path: &Path) -> Result<ArtifactsManifest> {
    load_document(path)
}

/// Load a manifest as a raw JSON value, for schema linting
pub fn load_raw(path: &Path) -> Result<JsonValue> {
    load_document(path)
}

/// Write a file, creating parent directories as needed. Returns the
/// absolute path written.
pub fn write_file_safe(path: &Path, content: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    let abs = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to resolve current directory")?
            .join(path)
    };
    Ok(abs)
}
