pub mod audit;
pub mod brief;
pub mod doctor;
pub mod mermaid;

pub use audit::{build_artifact_audit, evaluate_ci_gate, AuditResult, CiGateResult};
pub use brief::{build_markdown_brief, BriefOptions};
pub use doctor::{doctor_report, find_blockers, next_section, DoctorReport};
pub use mermaid::{build_mermaid, compute_focused_set, MermaidOptions};
