pub mod artifact;
pub mod issue;
pub mod section;

pub use artifact::{ArtifactItem, ArtifactVerification, ArtifactsManifest};
pub use issue::{Issue, IssueCode, Severity, ValidationReport};
pub use section::{
    ArtifactPatch, ArtifactRef, ArtifactStatus, ChecklistItem, ChecklistStatus, CompletionPolicy,
    RoadmapManifest, Section, SectionStatus, UiBehavior,
};
