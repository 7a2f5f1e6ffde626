use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Severity level for a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Fails validation; the state machine must not run against the manifest
    Error,
    /// Surfaced for human review, never blocks processing
    Warning,
}

impl Severity {
    /// Get display symbol for severity
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Error => "🔴",
            Severity::Warning => "🟡",
        }
    }

    /// Get display name for severity
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// Stable issue codes emitted by the manifest validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    DuplicateId,
    InvalidIdFormat,
    MissingDependency,
    SelfDependency,
    CycleDetected,
    MissingNextSection,
    MissingParent,
    InvalidParentLevel,
    RootWithParent,
    NonRootWithoutParent,
    OrphanChildLink,
    InvalidChecklistId,
    UnreachableSection,
}

impl IssueCode {
    /// Stable code string used in reports and automated triage
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::DuplicateId => "DUPLICATE_ID",
            IssueCode::InvalidIdFormat => "INVALID_ID_FORMAT",
            IssueCode::MissingDependency => "MISSING_DEPENDENCY",
            IssueCode::SelfDependency => "SELF_DEPENDENCY",
            IssueCode::CycleDetected => "CYCLE_DETECTED",
            IssueCode::MissingNextSection => "MISSING_NEXT_SECTION",
            IssueCode::MissingParent => "MISSING_PARENT",
            IssueCode::InvalidParentLevel => "INVALID_PARENT_LEVEL",
            IssueCode::RootWithParent => "ROOT_WITH_PARENT",
            IssueCode::NonRootWithoutParent => "NON_ROOT_WITHOUT_PARENT",
            IssueCode::OrphanChildLink => "ORPHAN_CHILD_LINK",
            IssueCode::InvalidChecklistId => "INVALID_CHECKLIST_ID",
            IssueCode::UnreachableSection => "UNREACHABLE_SECTION",
        }
    }
}

/// A structural issue found in a roadmap manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub code: IssueCode,
    pub severity: Severity,
    /// Offending section, when the issue is attributable to one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    pub detail: String,
}

impl Issue {
    /// Create an error-severity issue
    pub fn error(code: IssueCode, section_id: Option<String>, detail: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Error,
            section_id,
            detail: detail.into(),
        }
    }

    /// Create a warning-severity issue
    pub fn warning(code: IssueCode, section_id: Option<String>, detail: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            section_id,
            detail: detail.into(),
        }
    }

    /// Format issue for display
    pub fn format(&self) -> String {
        format!("[{}] {}", self.code.as_str(), self.detail)
    }
}

/// Verdict of manifest validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// True iff no errors were recorded; warnings never fail validation
    pub ok: bool,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
    /// Deterministic topological ordering of section ids. When a cycle is
    /// present this holds only the acyclic prefix Kahn's algorithm emitted.
    pub topo_order: Vec<String>,
    /// Section id -> declared dependency ids
    pub dependency_graph: BTreeMap<String, Vec<String>>,
}

impl ValidationReport {
    /// Format all errors and warnings for display, one line each
    pub fn format_issues(&self) -> String {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .map(|i| format!("- {}", i.format()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_code_serializes_screaming_snake() {
        let json = serde_json::to_string(&IssueCode::CycleDetected).unwrap();
        assert_eq!(json, "\"CYCLE_DETECTED\"");
        assert_eq!(IssueCode::CycleDetected.as_str(), "CYCLE_DETECTED");
    }

    #[test]
    fn test_issue_format_includes_code() {
        let issue = Issue::error(
            IssueCode::SelfDependency,
            Some("2.1".to_string()),
            "Section \"2.1\" cannot depend on itself.",
        );
        assert_eq!(
            issue.format(),
            "[SELF_DEPENDENCY] Section \"2.1\" cannot depend on itself."
        );
    }
}
