//! Section state machine
//!
//! A pure reducer over section stores: `(store, event) -> (store', ui
//! events)`. The reducer performs no I/O, holds no hidden state, and clones
//! the input snapshot, so identical inputs always yield identical results
//! and callers may keep prior snapshots as history.

use crate::models::{ArtifactPatch, ArtifactRef, ArtifactStatus, ChecklistStatus, Section, SectionStatus};
use crate::state::store::SectionStore;
use serde::{Deserialize, Serialize};

/// Artifact type that doubles as verification evidence
pub const CHECK_REPORT_TYPE: &str = "check_report";

/// Confetti display duration carried in completion notifications
pub const CONFETTI_DURATION_MS: u64 = 2600;

/// Discrete event fed into the reducer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectionEvent {
    /// Begin work; blocks instead when dependencies are incomplete
    SectionStart { section_id: String },
    /// Explicit manual block, with an optional operator-supplied reason
    SectionBlock {
        section_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Manual return to in_progress
    SectionUnblock { section_id: String },
    /// Record one checklist item's status
    ChecklistSet {
        section_id: String,
        checklist_id: String,
        status: ChecklistStatus,
    },
    /// Append an artifact reference to the section's record
    ArtifactAdd {
        section_id: String,
        artifact: ArtifactRef,
    },
    /// Patch an existing artifact reference
    ArtifactUpdate {
        section_id: String,
        artifact_id: String,
        patch: ArtifactPatch,
    },
    /// Record a verification outcome as a synthetic check_report artifact
    VerifyResult { section_id: String, pass: bool },
    /// Attempt completion against the section's completion rule
    TryComplete { section_id: String },
    /// External signal that previously verified behavior has regressed
    RegressionDetected {
        section_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl SectionEvent {
    /// The section this event addresses
    pub fn section_id(&self) -> &str {
        match self {
            SectionEvent::SectionStart { section_id }
            | SectionEvent::SectionBlock { section_id, .. }
            | SectionEvent::SectionUnblock { section_id }
            | SectionEvent::ChecklistSet { section_id, .. }
            | SectionEvent::ArtifactAdd { section_id, .. }
            | SectionEvent::ArtifactUpdate { section_id, .. }
            | SectionEvent::VerifyResult { section_id, .. }
            | SectionEvent::TryComplete { section_id }
            | SectionEvent::RegressionDetected { section_id, .. } => section_id,
        }
    }
}

/// Abstract description of an externally observable effect.
///
/// The core never decides how these are rendered; a UI layer consumes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UiEvent {
    ShowToast {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        section_id: Option<String>,
        message: String,
    },
    ShowConfetti {
        section_id: String,
        duration_ms: u64,
    },
    StrikethroughSection {
        section_id: String,
    },
    AutoSelectSection {
        section_id: String,
    },
    ShowBlockedCard {
        section_id: String,
        reason: String,
    },
    /// Placeholder for effects a renderer chose to suppress
    None,
}

/// Result of reducing one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub store: SectionStore,
    pub ui_events: Vec<UiEvent>,
}

/// Why a completion attempt was refused, in evaluation priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompletionBlocker {
    DependenciesIncomplete,
    ChildrenIncomplete,
    ChecklistNotPassing,
    ArtifactsMissing,
    VerificationMissing,
}

impl CompletionBlocker {
    fn message(&self) -> &'static str {
        match self {
            CompletionBlocker::DependenciesIncomplete => "Dependencies incomplete.",
            CompletionBlocker::ChildrenIncomplete => "Child sections not complete.",
            CompletionBlocker::ChecklistNotPassing => "Checklist incomplete or failing.",
            CompletionBlocker::ArtifactsMissing => "Required final artifacts missing.",
            CompletionBlocker::VerificationMissing => "Verification not passed.",
        }
    }
}

fn allowed_targets(from: SectionStatus) -> &'static [SectionStatus] {
    match from {
        SectionStatus::NotStarted => &[SectionStatus::InProgress, SectionStatus::Blocked],
        SectionStatus::InProgress => &[
            SectionStatus::Blocked,
            SectionStatus::Complete,
            SectionStatus::RegressionBlocked,
        ],
        SectionStatus::Blocked => &[SectionStatus::InProgress, SectionStatus::RegressionBlocked],
        SectionStatus::Complete => &[SectionStatus::RegressionBlocked],
        SectionStatus::RegressionBlocked => &[SectionStatus::InProgress, SectionStatus::Complete],
    }
}

/// Apply a status transition if legal.
///
/// Illegal transitions are a no-op that leaves status unchanged and emits an
/// informational toast. Every entry into blocked or regression_blocked emits
/// a blocked card with the supplied or default reason.
fn transition_status(
    section: &mut Section,
    target: SectionStatus,
    ui_events: &mut Vec<UiEvent>,
    reason: Option<&str>,
) -> bool {
    if !allowed_targets(section.status).contains(&target) {
        ui_events.push(UiEvent::ShowToast {
            section_id: Some(section.id.clone()),
            message: format!(
                "Illegal transition {} -> {}",
                section.status.name(),
                target.name()
            ),
        });
        return false;
    }

    section.status = target;

    if target == SectionStatus::Blocked || target == SectionStatus::RegressionBlocked {
        ui_events.push(UiEvent::ShowBlockedCard {
            section_id: section.id.clone(),
            reason: reason
                .unwrap_or("Blocked by unmet checks/dependencies.")
                .to_string(),
        });
    }

    true
}

fn all_dependencies_complete(store: &SectionStore, section: &Section) -> bool {
    section.dependencies.iter().all(|dep_id| {
        store
            .by_id
            .get(dep_id)
            .map(|dep| dep.status == SectionStatus::Complete)
            .unwrap_or(false)
    })
}

fn all_checklist_pass(section: &Section) -> bool {
    !section.checklist.is_empty()
        && section
            .checklist
            .iter()
            .all(|item| item.status == ChecklistStatus::Pass)
}

fn required_artifacts_present_and_final(artifacts: &[ArtifactRef], required_types: &[String]) -> bool {
    required_types.iter().all(|required| {
        artifacts
            .iter()
            .any(|a| a.status == ArtifactStatus::Final && &a.artifact_type == required)
    })
}

/// Evaluate whether recorded artifacts include a passing verification.
///
/// Preserved verbatim from the shipped rule: any final check_report counts
/// as a pass even when its own verify_pass flag is false or absent. Likely
/// a latent defect, kept for compatibility rather than silently tightened.
fn verify_pass_from_artifacts(artifacts: &[ArtifactRef]) -> bool {
    let final_checks: Vec<&ArtifactRef> = artifacts
        .iter()
        .filter(|a| {
            a.status == ArtifactStatus::Final
                && (a.artifact_type == CHECK_REPORT_TYPE || a.verify_pass.is_some())
        })
        .collect();

    if final_checks.is_empty() {
        return false;
    }

    final_checks
        .iter()
        .any(|a| a.verify_pass == Some(true) || a.artifact_type == CHECK_REPORT_TYPE)
}

fn is_parent(store: &SectionStore, section_id: &str) -> bool {
    store
        .children_by_parent
        .get(section_id)
        .map(|children| !children.is_empty())
        .unwrap_or(false)
}

fn all_children_complete(store: &SectionStore, section_id: &str) -> bool {
    let children = store.children(section_id);
    !children.is_empty()
        && children
            .iter()
            .all(|child| child.status == SectionStatus::Complete)
}

/// Evaluate completability for a section.
///
/// Parent sections (any section with children) complete on dependencies plus
/// children alone; their own checklist and artifacts are never consulted.
/// Leaves require dependencies, a non-empty fully-passing checklist, a final
/// artifact for every required type, and a passing verification.
fn can_complete_section(store: &SectionStore, section: &Section) -> Result<(), CompletionBlocker> {
    if !all_dependencies_complete(store, section) {
        return Err(CompletionBlocker::DependenciesIncomplete);
    }

    if is_parent(store, &section.id) {
        if !all_children_complete(store, &section.id) {
            return Err(CompletionBlocker::ChildrenIncomplete);
        }
        return Ok(());
    }

    let artifacts = store.artifacts(&section.id);

    if !all_checklist_pass(section) {
        return Err(CompletionBlocker::ChecklistNotPassing);
    }
    if !required_artifacts_present_and_final(artifacts, &section.required_artifact_types) {
        return Err(CompletionBlocker::ArtifactsMissing);
    }
    if !verify_pass_from_artifacts(artifacts) {
        return Err(CompletionBlocker::VerificationMissing);
    }

    Ok(())
}

/// Push the completion notification triad for a section
fn push_completion_events(section: &Section, ui_events: &mut Vec<UiEvent>, default_message: String) {
    ui_events.push(UiEvent::StrikethroughSection {
        section_id: section.id.clone(),
    });
    ui_events.push(UiEvent::ShowConfetti {
        section_id: section.id.clone(),
        duration_ms: CONFETTI_DURATION_MS,
    });
    ui_events.push(UiEvent::ShowToast {
        section_id: Some(section.id.clone()),
        message: section
            .completion_message
            .clone()
            .unwrap_or(default_message),
    });
}

/// Walk up the parent chain from a just-completed section, marking each
/// ancestor complete once its own completion rule holds. An ancestor that
/// does not qualify halts further upward propagation.
fn auto_complete_parent_chain(store: &mut SectionStore, starting_section_id: &str, ui_events: &mut Vec<UiEvent>) {
    let mut current_id = starting_section_id.to_string();

    while let Some(parent_id) = store
        .by_id
        .get(&current_id)
        .and_then(|s| s.parent_id.clone())
    {
        let Some(parent) = store.by_id.get(&parent_id) else {
            break;
        };

        if can_complete_section(store, parent).is_err() {
            break;
        }

        if parent.status != SectionStatus::Complete {
            let default_message = format!("Congratulations on completing section {}!", parent_id);
            let Some(parent) = store.by_id.get_mut(&parent_id) else {
                break;
            };
            parent.status = SectionStatus::Complete;
            push_completion_events(parent, ui_events, default_message);
        }

        current_id = parent_id;
    }
}

/// Reduce one event against a store snapshot.
///
/// Unknown section, checklist, or artifact references make the event a
/// no-op for the affected mutation, surfaced only as a toast.
pub fn reduce(store: &SectionStore, event: &SectionEvent) -> Transition {
    let mut next = store.clone();
    let mut ui_events = Vec::new();

    let section_id = event.section_id().to_string();

    if !next.by_id.contains_key(&section_id) {
        return Transition {
            store: next,
            ui_events: vec![UiEvent::ShowToast {
                section_id: None,
                message: format!("Unknown section {}", section_id),
            }],
        };
    }

    match event {
        SectionEvent::SectionStart { .. } => {
            let deps_ok = next
                .by_id
                .get(&section_id)
                .is_some_and(|section| all_dependencies_complete(&next, section));
            if let Some(section) = next.by_id.get_mut(&section_id) {
                if deps_ok {
                    transition_status(section, SectionStatus::InProgress, &mut ui_events, None);
                } else {
                    transition_status(
                        section,
                        SectionStatus::Blocked,
                        &mut ui_events,
                        Some("Dependencies incomplete."),
                    );
                }
            }
        }

        SectionEvent::SectionBlock { reason, .. } => {
            if let Some(section) = next.by_id.get_mut(&section_id) {
                let target = if section.status == SectionStatus::Complete {
                    SectionStatus::RegressionBlocked
                } else {
                    SectionStatus::Blocked
                };
                transition_status(section, target, &mut ui_events, reason.as_deref());
            }
        }

        SectionEvent::SectionUnblock { .. } => {
            if let Some(section) = next.by_id.get_mut(&section_id) {
                transition_status(section, SectionStatus::InProgress, &mut ui_events, None);
            }
        }

        SectionEvent::ChecklistSet {
            checklist_id,
            status,
            ..
        } => {
            let Some(section) = next.by_id.get_mut(&section_id) else {
                return Transition {
                    store: next,
                    ui_events,
                };
            };
            let Some(item) = section.checklist.iter_mut().find(|c| &c.id == checklist_id) else {
                ui_events.push(UiEvent::ShowToast {
                    section_id: Some(section_id),
                    message: format!("Checklist item not found: {}", checklist_id),
                });
                return Transition {
                    store: next,
                    ui_events,
                };
            };

            item.status = *status;

            if *status == ChecklistStatus::Fail || *status == ChecklistStatus::Blocked {
                if section.status == SectionStatus::Complete {
                    let reason = format!("Checklist {} no longer passing.", checklist_id);
                    transition_status(
                        section,
                        SectionStatus::RegressionBlocked,
                        &mut ui_events,
                        Some(&reason),
                    );
                } else if section.status != SectionStatus::Blocked {
                    let reason = format!("Checklist {} failed.", checklist_id);
                    transition_status(section, SectionStatus::Blocked, &mut ui_events, Some(&reason));
                }
            }
        }

        SectionEvent::ArtifactAdd { artifact, .. } => {
            next.artifacts_by_section
                .entry(section_id)
                .or_default()
                .push(artifact.clone());
        }

        SectionEvent::ArtifactUpdate {
            artifact_id, patch, ..
        } => {
            // Read-only lookup: a miss must leave the store untouched, so
            // no artifact list is created for the section here.
            let existing = next
                .artifacts_by_section
                .get_mut(&section_id)
                .and_then(|artifacts| artifacts.iter_mut().find(|a| &a.artifact_id == artifact_id));
            match existing {
                Some(artifact) => artifact.apply(patch),
                None => ui_events.push(UiEvent::ShowToast {
                    section_id: Some(section_id),
                    message: format!("Artifact not found: {}", artifact_id),
                }),
            }
        }

        SectionEvent::VerifyResult { pass, .. } => {
            let artifacts = next.artifacts_by_section.entry(section_id.clone()).or_default();
            // Sequence number keeps the synthetic id deterministic for
            // identical (store, event) pairs.
            let sequence = artifacts.len();
            artifacts.push(ArtifactRef {
                artifact_id: format!("verify:{}:{}", section_id, sequence),
                artifact_type: CHECK_REPORT_TYPE.to_string(),
                status: if *pass {
                    ArtifactStatus::Final
                } else {
                    ArtifactStatus::Failed
                },
                verify_pass: Some(*pass),
            });

            if !pass {
                let Some(section) = next.by_id.get_mut(&section_id) else {
                    return Transition {
                        store: next,
                        ui_events,
                    };
                };
                if section.status == SectionStatus::Complete {
                    transition_status(
                        section,
                        SectionStatus::RegressionBlocked,
                        &mut ui_events,
                        Some("Verification failed after completion."),
                    );
                } else {
                    transition_status(
                        section,
                        SectionStatus::Blocked,
                        &mut ui_events,
                        Some("Verification failed."),
                    );
                }
            }
        }

        SectionEvent::TryComplete { .. } => {
            let not_started = next
                .by_id
                .get(&section_id)
                .is_some_and(|section| section.status == SectionStatus::NotStarted);
            if not_started {
                if let Some(section) = next.by_id.get_mut(&section_id) {
                    transition_status(section, SectionStatus::InProgress, &mut ui_events, None);
                }
            }

            let Some(verdict) = next
                .by_id
                .get(&section_id)
                .map(|section| can_complete_section(&next, section))
            else {
                return Transition {
                    store: next,
                    ui_events,
                };
            };

            if let Err(blocker) = verdict {
                if let Some(section) = next.by_id.get_mut(&section_id) {
                    let target = if section.status == SectionStatus::Complete {
                        SectionStatus::RegressionBlocked
                    } else {
                        SectionStatus::Blocked
                    };
                    transition_status(section, target, &mut ui_events, Some(blocker.message()));
                }
                return Transition {
                    store: next,
                    ui_events,
                };
            }

            let moved = next.by_id.get_mut(&section_id).is_some_and(|section| {
                transition_status(section, SectionStatus::Complete, &mut ui_events, None)
            });
            if !moved {
                return Transition {
                    store: next,
                    ui_events,
                };
            }

            if let Some(section) = next.by_id.get(&section_id) {
                let default_message =
                    format!("🎉 Congratulations on completing section {}!", section_id);
                push_completion_events(section, &mut ui_events, default_message);

                if let Some(next_section_id) = &section.next_section_id {
                    ui_events.push(UiEvent::AutoSelectSection {
                        section_id: next_section_id.clone(),
                    });
                }
            }

            auto_complete_parent_chain(&mut next, &section_id, &mut ui_events);
        }

        SectionEvent::RegressionDetected { reason, .. } => {
            let Some(section) = next.by_id.get_mut(&section_id) else {
                return Transition {
                    store: next,
                    ui_events,
                };
            };
            if section.status == SectionStatus::Complete {
                transition_status(
                    section,
                    SectionStatus::RegressionBlocked,
                    &mut ui_events,
                    Some(reason.as_deref().unwrap_or("Regression detected.")),
                );
            } else {
                transition_status(
                    section,
                    SectionStatus::Blocked,
                    &mut ui_events,
                    Some(reason.as_deref().unwrap_or("Regression risk detected.")),
                );
            }
        }
    }

    Transition {
        store: next,
        ui_events,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChecklistItem;
    use crate::state::store::initialize_store;

    fn leaf(id: &str, parent: Option<&str>, deps: &[&str]) -> Section {
        Section {
            id: id.to_string(),
            title: format!("Section {}", id),
            level: if parent.is_some() { 2 } else { 1 },
            parent_id: parent.map(String::from),
            status: SectionStatus::NotStarted,
            goal: String::new(),
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            required_artifact_types: vec!["task_packet".to_string(), CHECK_REPORT_TYPE.to_string()],
            checklist: vec![ChecklistItem {
                id: format!("{}.c1", id),
                text: "done".to_string(),
                status: ChecklistStatus::NotStarted,
            }],
            completion_rule: None,
            completion_message: None,
            next_section_id: None,
        }
    }

    fn seed() -> SectionStore {
        let mut parent = leaf("1.0", None, &[]);
        parent.required_artifact_types.clear();
        initialize_store(&[
            parent,
            leaf("1.1", Some("1.0"), &[]),
            leaf("1.2", Some("1.0"), &["1.1"]),
        ])
    }

    fn pass_all_checks(store: SectionStore, id: &str) -> SectionStore {
        let store = reduce(
            &store,
            &SectionEvent::ChecklistSet {
                section_id: id.to_string(),
                checklist_id: format!("{}.c1", id),
                status: ChecklistStatus::Pass,
            },
        )
        .store;
        let store = reduce(
            &store,
            &SectionEvent::ArtifactAdd {
                section_id: id.to_string(),
                artifact: ArtifactRef {
                    artifact_id: format!("{}:packet", id),
                    artifact_type: "task_packet".to_string(),
                    status: ArtifactStatus::Final,
                    verify_pass: None,
                },
            },
        )
        .store;
        reduce(
            &store,
            &SectionEvent::VerifyResult {
                section_id: id.to_string(),
                pass: true,
            },
        )
        .store
    }

    fn complete(store: SectionStore, id: &str) -> Transition {
        let store = reduce(
            &store,
            &SectionEvent::SectionStart {
                section_id: id.to_string(),
            },
        )
        .store;
        let store = pass_all_checks(store, id);
        reduce(
            &store,
            &SectionEvent::TryComplete {
                section_id: id.to_string(),
            },
        )
    }

    #[test]
    fn test_start_blocks_on_incomplete_dependencies() {
        let store = seed();
        let result = reduce(
            &store,
            &SectionEvent::SectionStart {
                section_id: "1.2".to_string(),
            },
        );

        assert_eq!(result.store.by_id["1.2"].status, SectionStatus::Blocked);
        assert!(result
            .ui_events
            .iter()
            .any(|e| matches!(e, UiEvent::ShowBlockedCard { .. })));
    }

    #[test]
    fn test_leaf_completes_with_full_evidence() {
        let result = complete(seed(), "1.1");

        assert_eq!(result.store.by_id["1.1"].status, SectionStatus::Complete);
        assert!(result
            .ui_events
            .iter()
            .any(|e| matches!(e, UiEvent::ShowConfetti { .. })));
        assert!(result
            .ui_events
            .iter()
            .any(|e| matches!(e, UiEvent::StrikethroughSection { .. })));
    }

    #[test]
    fn test_completion_refused_when_required_artifact_missing() {
        let store = reduce(
            &seed(),
            &SectionEvent::SectionStart {
                section_id: "1.1".to_string(),
            },
        )
        .store;
        let store = reduce(
            &store,
            &SectionEvent::ChecklistSet {
                section_id: "1.1".to_string(),
                checklist_id: "1.1.c1".to_string(),
                status: ChecklistStatus::Pass,
            },
        )
        .store;
        // Verification passes (and satisfies the check_report requirement)
        // but task_packet is still missing.
        let store = reduce(
            &store,
            &SectionEvent::VerifyResult {
                section_id: "1.1".to_string(),
                pass: true,
            },
        )
        .store;

        let result = reduce(
            &store,
            &SectionEvent::TryComplete {
                section_id: "1.1".to_string(),
            },
        );

        assert_eq!(result.store.by_id["1.1"].status, SectionStatus::Blocked);
        assert!(result.ui_events.iter().any(|e| matches!(
            e,
            UiEvent::ShowBlockedCard { reason, .. } if reason == "Required final artifacts missing."
        )));
    }

    #[test]
    fn test_parent_cascades_without_explicit_attempt() {
        let store = complete(seed(), "1.1").store;
        let result = complete(store, "1.2");

        assert_eq!(result.store.by_id["1.0"].status, SectionStatus::Complete);
        let confetti = result
            .ui_events
            .iter()
            .filter(|e| matches!(e, UiEvent::ShowConfetti { .. }))
            .count();
        // One for 1.2 itself, one for the cascaded 1.0
        assert_eq!(confetti, 2);
    }

    #[test]
    fn test_try_complete_is_idempotent_without_duplicate_cascade() {
        let store = complete(seed(), "1.1").store;
        let store = complete(store, "1.2").store;

        let again = reduce(
            &store,
            &SectionEvent::TryComplete {
                section_id: "1.2".to_string(),
            },
        );

        assert_eq!(again.store.by_id["1.2"].status, SectionStatus::Complete);
        assert_eq!(again.store.by_id["1.0"].status, SectionStatus::Complete);
        assert!(!again
            .ui_events
            .iter()
            .any(|e| matches!(e, UiEvent::ShowConfetti { .. })));
    }

    #[test]
    fn test_regression_from_complete_goes_to_regression_blocked() {
        let store = complete(seed(), "1.1").store;

        let result = reduce(
            &store,
            &SectionEvent::RegressionDetected {
                section_id: "1.1".to_string(),
                reason: Some("Post-merge test failed".to_string()),
            },
        );

        assert_eq!(
            result.store.by_id["1.1"].status,
            SectionStatus::RegressionBlocked
        );
        assert!(result.ui_events.iter().any(|e| matches!(
            e,
            UiEvent::ShowBlockedCard { reason, .. } if reason == "Post-merge test failed"
        )));
    }

    #[test]
    fn test_failed_verification_regresses_complete_section() {
        let store = complete(seed(), "1.1").store;

        let result = reduce(
            &store,
            &SectionEvent::VerifyResult {
                section_id: "1.1".to_string(),
                pass: false,
            },
        );

        assert_eq!(
            result.store.by_id["1.1"].status,
            SectionStatus::RegressionBlocked
        );
    }

    #[test]
    fn test_checklist_fail_blocks_in_progress_section() {
        let store = reduce(
            &seed(),
            &SectionEvent::SectionStart {
                section_id: "1.1".to_string(),
            },
        )
        .store;

        let result = reduce(
            &store,
            &SectionEvent::ChecklistSet {
                section_id: "1.1".to_string(),
                checklist_id: "1.1.c1".to_string(),
                status: ChecklistStatus::Fail,
            },
        );

        assert_eq!(result.store.by_id["1.1"].status, SectionStatus::Blocked);
        assert_eq!(
            result.store.by_id["1.1"].checklist[0].status,
            ChecklistStatus::Fail
        );
    }

    #[test]
    fn test_blocked_section_cannot_jump_to_complete() {
        let store = reduce(
            &seed(),
            &SectionEvent::SectionStart {
                section_id: "1.1".to_string(),
            },
        )
        .store;
        let store = reduce(
            &store,
            &SectionEvent::ChecklistSet {
                section_id: "1.1".to_string(),
                checklist_id: "1.1.c1".to_string(),
                status: ChecklistStatus::Fail,
            },
        )
        .store;
        // Repair the evidence; status is still blocked, and blocked ->
        // complete is not a legal transition.
        let store = pass_all_checks(store, "1.1");

        let result = reduce(
            &store,
            &SectionEvent::TryComplete {
                section_id: "1.1".to_string(),
            },
        );

        assert_eq!(result.store.by_id["1.1"].status, SectionStatus::Blocked);
        assert!(result.ui_events.iter().any(|e| matches!(
            e,
            UiEvent::ShowToast { message, .. } if message.starts_with("Illegal transition")
        )));
    }

    #[test]
    fn test_unknown_section_is_noop_with_toast() {
        let store = seed();
        let result = reduce(
            &store,
            &SectionEvent::SectionStart {
                section_id: "9.9".to_string(),
            },
        );

        assert_eq!(result.store, store);
        assert!(matches!(&result.ui_events[0], UiEvent::ShowToast { .. }));
    }

    #[test]
    fn test_unknown_checklist_item_records_nothing() {
        let store = seed();
        let result = reduce(
            &store,
            &SectionEvent::ChecklistSet {
                section_id: "1.1".to_string(),
                checklist_id: "1.1.c9".to_string(),
                status: ChecklistStatus::Pass,
            },
        );

        assert_eq!(result.store, store);
    }

    #[test]
    fn test_unknown_artifact_update_records_nothing() {
        let store = seed();
        let result = reduce(
            &store,
            &SectionEvent::ArtifactUpdate {
                section_id: "1.1".to_string(),
                artifact_id: "1.1:missing".to_string(),
                patch: ArtifactPatch {
                    status: Some(ArtifactStatus::Final),
                    ..Default::default()
                },
            },
        );

        // No empty artifact list may appear for the section
        assert_eq!(result.store, store);
        assert!(matches!(
            &result.ui_events[0],
            UiEvent::ShowToast { message, .. } if message == "Artifact not found: 1.1:missing"
        ));
    }

    #[test]
    fn test_artifact_update_patches_in_place() {
        let store = reduce(
            &seed(),
            &SectionEvent::ArtifactAdd {
                section_id: "1.1".to_string(),
                artifact: ArtifactRef {
                    artifact_id: "1.1:packet".to_string(),
                    artifact_type: "task_packet".to_string(),
                    status: ArtifactStatus::Draft,
                    verify_pass: None,
                },
            },
        )
        .store;

        let result = reduce(
            &store,
            &SectionEvent::ArtifactUpdate {
                section_id: "1.1".to_string(),
                artifact_id: "1.1:packet".to_string(),
                patch: ArtifactPatch {
                    status: Some(ArtifactStatus::Final),
                    ..Default::default()
                },
            },
        );

        assert_eq!(
            result.store.artifacts("1.1")[0].status,
            ArtifactStatus::Final
        );
    }

    #[test]
    fn test_reduce_is_deterministic() {
        let store = pass_all_checks(seed(), "1.1");
        let event = SectionEvent::TryComplete {
            section_id: "1.1".to_string(),
        };

        let first = reduce(&store, &event);
        let second = reduce(&store, &event);

        assert_eq!(first.store, second.store);
        assert_eq!(first.ui_events, second.ui_events);
        assert_eq!(
            serde_json::to_string(&first.store).unwrap(),
            serde_json::to_string(&second.store).unwrap()
        );
    }

    #[test]
    fn test_verify_result_artifact_id_is_sequence_based() {
        let store = seed();
        let store = reduce(
            &store,
            &SectionEvent::VerifyResult {
                section_id: "1.1".to_string(),
                pass: true,
            },
        )
        .store;
        let store = reduce(
            &store,
            &SectionEvent::VerifyResult {
                section_id: "1.1".to_string(),
                pass: false,
            },
        )
        .store;

        let ids: Vec<&str> = store
            .artifacts("1.1")
            .iter()
            .map(|a| a.artifact_id.as_str())
            .collect();
        assert_eq!(ids, vec!["verify:1.1:0", "verify:1.1:1"]);
    }

    #[test]
    fn test_final_check_report_counts_as_verification_even_without_flag() {
        // The permissive shipped rule: a final check_report passes
        // verification regardless of its own verify_pass flag.
        let artifacts = vec![ArtifactRef {
            artifact_id: "r1".to_string(),
            artifact_type: CHECK_REPORT_TYPE.to_string(),
            status: ArtifactStatus::Final,
            verify_pass: Some(false),
        }];
        assert!(verify_pass_from_artifacts(&artifacts));
    }

    #[test]
    fn test_superseded_attempts_do_not_block_completion() {
        let store = reduce(
            &seed(),
            &SectionEvent::SectionStart {
                section_id: "1.1".to_string(),
            },
        )
        .store;
        let store = reduce(
            &store,
            &SectionEvent::ChecklistSet {
                section_id: "1.1".to_string(),
                checklist_id: "1.1.c1".to_string(),
                status: ChecklistStatus::Pass,
            },
        )
        .store;
        // A superseded packet followed by a final one of the same type
        let store = reduce(
            &store,
            &SectionEvent::ArtifactAdd {
                section_id: "1.1".to_string(),
                artifact: ArtifactRef {
                    artifact_id: "1.1:packet-v1".to_string(),
                    artifact_type: "task_packet".to_string(),
                    status: ArtifactStatus::Superseded,
                    verify_pass: None,
                },
            },
        )
        .store;
        let store = reduce(
            &store,
            &SectionEvent::ArtifactAdd {
                section_id: "1.1".to_string(),
                artifact: ArtifactRef {
                    artifact_id: "1.1:packet-v2".to_string(),
                    artifact_type: "task_packet".to_string(),
                    status: ArtifactStatus::Final,
                    verify_pass: None,
                },
            },
        )
        .store;
        let store = reduce(
            &store,
            &SectionEvent::VerifyResult {
                section_id: "1.1".to_string(),
                pass: true,
            },
        )
        .store;

        let result = reduce(
            &store,
            &SectionEvent::TryComplete {
                section_id: "1.1".to_string(),
            },
        );
        assert_eq!(result.store.by_id["1.1"].status, SectionStatus::Complete);
    }
}
