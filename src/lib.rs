// Roadmapd - Roadmap Manifest Validator and Section Lifecycle Engine
// A Rust-powered tool for keeping milestone roadmaps consistent and automatable

pub mod cli;
pub mod models;
pub mod report;
pub mod state;
pub mod validator;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use models::{Issue, IssueCode, RoadmapManifest, Section, SectionStatus, ValidationReport};
pub use state::{reduce, SectionEvent, SectionStore, Transition};
