// Copyright 2025 Cowboy AI, LLC.

//! Change Request Aggregate
//!
//! The change request aggregate is a pair of pure functions following event
//! sourcing principles: [`decide`] validates a command against current state
//! and emits events, [`apply`] folds one event into the next state. Folding
//! the full ordered event history from [`initial_state`] reconstructs current
//! state; that replay contract is the correctness property everything else
//! hinges on.
//!
//! Neither function performs I/O or reads ambient time. Persistence of the
//! emitted events and per-identifier serialization of the
//! decide/persist/apply cycle belong to the host (see `changeflow-store`).

use super::commands::ChangeRequestCommand;
use super::events::ChangeRequestEvent;
use super::value_objects::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result type for decisions
pub type DecideResult = Result<Vec<ChangeRequestEvent>, DecideError>;

/// Lifecycle states of a change request
///
/// Every state except `NotExist` owns the aggregate identity; the in-flight
/// states additionally carry the shared change context. `Merging` drops the
/// git context (the only remaining question is whether the merge applied
/// cleanly) and `Closed` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeRequestState {
    /// The fold's starting point; no change request has been seen yet
    NotExist,

    /// Code has been pushed or updated but no successful plan exists yet
    InProgress {
        id: ChangeRequestId,
        change_request_url: String,
        git_change_context: GitChangeContext,
        source_scm_type: ScmType,
        scm_requests: Vec<ScmRequest>,
    },

    /// The last plan succeeded; an apply may be requested
    Applyable {
        id: ChangeRequestId,
        change_request_url: String,
        git_change_context: GitChangeContext,
        source_scm_type: ScmType,
        scm_requests: Vec<ScmRequest>,
    },

    /// An apply has been requested; its outcome is pending
    Applying {
        id: ChangeRequestId,
        change_request_url: String,
        git_change_context: GitChangeContext,
        source_scm_type: ScmType,
        scm_requests: Vec<ScmRequest>,
    },

    /// The apply succeeded; waiting for merge confirmation
    Merging {
        id: ChangeRequestId,
        change_request_url: String,
        source_scm_type: ScmType,
        scm_requests: Vec<ScmRequest>,
        output_apply: String,
    },

    /// Terminal; the change request was merged and rejects all commands
    Closed { id: ChangeRequestId },
}

impl ChangeRequestState {
    /// Aggregate identity; `None` only for `NotExist`
    pub fn id(&self) -> Option<&ChangeRequestId> {
        match self {
            ChangeRequestState::NotExist => None,
            ChangeRequestState::InProgress { id, .. } => Some(id),
            ChangeRequestState::Applyable { id, .. } => Some(id),
            ChangeRequestState::Applying { id, .. } => Some(id),
            ChangeRequestState::Merging { id, .. } => Some(id),
            ChangeRequestState::Closed { id } => Some(id),
        }
    }

    /// State type as string
    pub fn state_type(&self) -> &'static str {
        match self {
            ChangeRequestState::NotExist => "NotExist",
            ChangeRequestState::InProgress { .. } => "InProgress",
            ChangeRequestState::Applyable { .. } => "Applyable",
            ChangeRequestState::Applying { .. } => "Applying",
            ChangeRequestState::Merging { .. } => "Merging",
            ChangeRequestState::Closed { .. } => "Closed",
        }
    }
}

/// Well-known zero value for a never-seen identifier
pub fn initial_state() -> ChangeRequestState {
    ChangeRequestState::NotExist
}

// ============================================================================
// Decider
// ============================================================================

/// Validate a command against current state and emit events
///
/// Total over every (state, command) pair. Three outcomes are possible:
///
/// - `Ok(events)` with one event per accepted transition,
/// - `Ok(vec![])` for commands that are merely redundant given in-flight
///   work (safe to retry blindly),
/// - `Err(reason)` for commands that violate lifecycle ordering or target a
///   terminal or nonexistent change request.
///
/// `now` stamps any emitted event; it is injected so the decision stays
/// deterministic and testable.
pub fn decide(
    command: &ChangeRequestCommand,
    state: &ChangeRequestState,
    now: DateTime<Utc>,
) -> DecideResult {
    match state {
        ChangeRequestState::NotExist => decide_on_not_exist(command, now),
        ChangeRequestState::InProgress { id, .. } => decide_on_in_progress(command, id, now),
        ChangeRequestState::Applyable { id, .. } => decide_on_applyable(command, id, now),
        ChangeRequestState::Applying { id, .. } => decide_on_applying(command, id, now),
        ChangeRequestState::Merging { id, .. } => decide_on_merging(command, id, now),
        ChangeRequestState::Closed { .. } => Err(DecideError::AlreadyClosed),
    }
}

fn decide_on_not_exist(command: &ChangeRequestCommand, now: DateTime<Utc>) -> DecideResult {
    match command {
        ChangeRequestCommand::Create {
            id,
            change_request_url,
            git_change_context,
            source_scm_type,
        } => emit(ChangeRequestEvent::created(
            *id,
            now,
            change_request_url.clone(),
            git_change_context.clone(),
            *source_scm_type,
        )),
        _ => Err(DecideError::NotExist),
    }
}

fn decide_on_in_progress(
    command: &ChangeRequestCommand,
    id: &ChangeRequestId,
    now: DateTime<Utc>,
) -> DecideResult {
    match command {
        ChangeRequestCommand::Create { .. } => Err(DecideError::AlreadyExists),
        ChangeRequestCommand::PushCode { .. } => emit(ChangeRequestEvent::code_pushed(*id, now)),
        ChangeRequestCommand::RequestPlan { .. } => {
            emit(ChangeRequestEvent::plan_requested(*id, now))
        }
        ChangeRequestCommand::SubmitPlanResult {
            output_plan,
            success,
            ..
        } => emit(ChangeRequestEvent::code_planned(
            *id,
            now,
            output_plan.clone(),
            *success,
        )),
        ChangeRequestCommand::RequestApply { .. } => Err(DecideError::PlanRequired),
        ChangeRequestCommand::SubmitApplyResult { .. } => Err(DecideError::PlanRequired),
        ChangeRequestCommand::RequestMerge { .. } => Err(DecideError::ApplyRequired),
        ChangeRequestCommand::SubmitMergeResult { .. } => Err(DecideError::ApplyRequired),
    }
}

fn decide_on_applyable(
    command: &ChangeRequestCommand,
    id: &ChangeRequestId,
    now: DateTime<Utc>,
) -> DecideResult {
    match command {
        ChangeRequestCommand::Create { .. } => Err(DecideError::AlreadyExists),
        ChangeRequestCommand::PushCode { .. } => emit(ChangeRequestEvent::code_pushed(*id, now)),
        ChangeRequestCommand::RequestPlan { .. } => {
            emit(ChangeRequestEvent::plan_requested(*id, now))
        }
        // A failed plan is a valid result, not a command rejection.
        ChangeRequestCommand::SubmitPlanResult {
            output_plan,
            success,
            ..
        } => emit(ChangeRequestEvent::code_planned(
            *id,
            now,
            output_plan.clone(),
            *success,
        )),
        ChangeRequestCommand::RequestApply { .. } => {
            emit(ChangeRequestEvent::apply_requested(*id, now))
        }
        ChangeRequestCommand::SubmitApplyResult { .. } => Err(DecideError::ApplyNotRequested),
        ChangeRequestCommand::RequestMerge { .. } => Err(DecideError::ApplyRequired),
        ChangeRequestCommand::SubmitMergeResult { .. } => Err(DecideError::ApplyRequired),
    }
}

fn decide_on_applying(
    command: &ChangeRequestCommand,
    id: &ChangeRequestId,
    now: DateTime<Utc>,
) -> DecideResult {
    match command {
        ChangeRequestCommand::Create { .. } => Err(DecideError::AlreadyExists),
        // Redundant while an apply is in flight; accepted with no effect so
        // callers can retry blindly.
        ChangeRequestCommand::PushCode { .. } => Ok(vec![]),
        ChangeRequestCommand::RequestPlan { .. } => Ok(vec![]),
        ChangeRequestCommand::SubmitPlanResult { .. } => Ok(vec![]),
        ChangeRequestCommand::RequestApply { .. } => Ok(vec![]),
        ChangeRequestCommand::SubmitApplyResult {
            output_apply,
            success,
            ..
        } => emit(ChangeRequestEvent::code_applied(
            *id,
            now,
            output_apply.clone(),
            *success,
        )),
        ChangeRequestCommand::RequestMerge { .. } => Err(DecideError::ApplyRequired),
        ChangeRequestCommand::SubmitMergeResult { .. } => Err(DecideError::ApplyRequired),
    }
}

fn decide_on_merging(
    command: &ChangeRequestCommand,
    id: &ChangeRequestId,
    now: DateTime<Utc>,
) -> DecideResult {
    // Merge retries are expected; a failed merge does not regress state, the
    // caller simply resubmits.
    match command {
        ChangeRequestCommand::SubmitMergeResult { success: true, .. } => {
            emit(ChangeRequestEvent::code_merged(*id, now))
        }
        _ => Ok(vec![]),
    }
}

fn emit(event: ChangeRequestEvent) -> DecideResult {
    Ok(vec![event])
}

// ============================================================================
// Applier
// ============================================================================

/// Fold one event into the next state
///
/// Total and infallible: any (state, event) combination without an explicit
/// transition leaves state unchanged, so unknown or currently-inapplicable
/// events never break replay.
pub fn apply(state: ChangeRequestState, event: &ChangeRequestEvent) -> ChangeRequestState {
    match (state, event) {
        (
            ChangeRequestState::NotExist,
            ChangeRequestEvent::Created {
                id,
                change_request_url,
                git_change_context,
                source_scm_type,
                ..
            },
        ) => ChangeRequestState::InProgress {
            id: *id,
            change_request_url: change_request_url.clone(),
            git_change_context: git_change_context.clone(),
            source_scm_type: *source_scm_type,
            scm_requests: vec![],
        },

        (
            ChangeRequestState::InProgress {
                id,
                change_request_url,
                git_change_context,
                source_scm_type,
                scm_requests,
            },
            ChangeRequestEvent::CodePlanned { success: true, .. },
        ) => ChangeRequestState::Applyable {
            id,
            change_request_url,
            git_change_context,
            source_scm_type,
            scm_requests,
        },

        // A new push invalidates the last successful plan.
        (
            ChangeRequestState::Applyable {
                id,
                change_request_url,
                git_change_context,
                source_scm_type,
                scm_requests,
            },
            ChangeRequestEvent::CodePushed { .. },
        )
        | (
            ChangeRequestState::Applying {
                id,
                change_request_url,
                git_change_context,
                source_scm_type,
                scm_requests,
            },
            ChangeRequestEvent::CodePushed { .. },
        ) => ChangeRequestState::InProgress {
            id,
            change_request_url,
            git_change_context,
            source_scm_type,
            scm_requests,
        },

        (
            ChangeRequestState::Applyable {
                id,
                change_request_url,
                source_scm_type,
                scm_requests,
                ..
            },
            ChangeRequestEvent::CodeApplied {
                output_apply,
                success: true,
                ..
            },
        )
        | (
            ChangeRequestState::Applying {
                id,
                change_request_url,
                source_scm_type,
                scm_requests,
                ..
            },
            ChangeRequestEvent::CodeApplied {
                output_apply,
                success: true,
                ..
            },
        ) => ChangeRequestState::Merging {
            id,
            change_request_url,
            source_scm_type,
            scm_requests,
            output_apply: output_apply.clone(),
        },

        // A failed apply sends the request back to the start of the plan
        // cycle; so does a failed re-plan while applying.
        (
            ChangeRequestState::Applyable {
                id,
                change_request_url,
                git_change_context,
                source_scm_type,
                scm_requests,
            },
            ChangeRequestEvent::CodeApplied { success: false, .. },
        )
        | (
            ChangeRequestState::Applying {
                id,
                change_request_url,
                git_change_context,
                source_scm_type,
                scm_requests,
            },
            ChangeRequestEvent::CodeApplied { success: false, .. },
        )
        | (
            ChangeRequestState::Applying {
                id,
                change_request_url,
                git_change_context,
                source_scm_type,
                scm_requests,
            },
            ChangeRequestEvent::CodePlanned { success: false, .. },
        ) => ChangeRequestState::InProgress {
            id,
            change_request_url,
            git_change_context,
            source_scm_type,
            scm_requests,
        },

        (ChangeRequestState::Merging { id, .. }, ChangeRequestEvent::CodeMerged { .. }) => {
            ChangeRequestState::Closed { id }
        }

        (state, _) => state,
    }
}

// ============================================================================
// Replay
// ============================================================================

/// Fold an ordered event sequence into a state
pub fn fold<'a, I>(state: ChangeRequestState, events: I) -> ChangeRequestState
where
    I: IntoIterator<Item = &'a ChangeRequestEvent>,
{
    events.into_iter().fold(state, apply)
}

/// Rebuild current state from the full ordered event history
pub fn replay<'a, I>(events: I) -> ChangeRequestState
where
    I: IntoIterator<Item = &'a ChangeRequestEvent>,
{
    fold(initial_state(), events)
}
