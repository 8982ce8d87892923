// Copyright 2025 Cowboy AI, LLC.

//! Change Request Domain Events
//!
//! All state changes are represented as immutable events. Each event carries
//! the change request identifier and the timestamp at which it happened.
//! Timestamps are injected by the caller's clock at construction time; the
//! decider and the applier never read ambient time, and ordering is entirely
//! positional within the persisted stream, never timestamp-based.

use super::value_objects::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain events for the change request aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeRequestEvent {
    /// A change request was opened
    Created {
        id: ChangeRequestId,
        happened_at: DateTime<Utc>,
        change_request_url: String,
        git_change_context: GitChangeContext,
        source_scm_type: ScmType,
    },

    /// Code was pushed on the source branch
    CodePushed {
        id: ChangeRequestId,
        happened_at: DateTime<Utc>,
    },

    /// A plan run was requested
    PlanRequested {
        id: ChangeRequestId,
        happened_at: DateTime<Utc>,
    },

    /// A plan run finished, successfully or not
    CodePlanned {
        id: ChangeRequestId,
        happened_at: DateTime<Utc>,
        output_plan: String,
        success: bool,
    },

    /// An apply run was requested
    ApplyRequested {
        id: ChangeRequestId,
        happened_at: DateTime<Utc>,
    },

    /// An apply run finished, successfully or not
    CodeApplied {
        id: ChangeRequestId,
        happened_at: DateTime<Utc>,
        output_apply: String,
        success: bool,
    },

    /// The change request was merged in the SCM
    CodeMerged {
        id: ChangeRequestId,
        happened_at: DateTime<Utc>,
    },
}

impl ChangeRequestEvent {
    /// Identifier of the change request this event belongs to
    pub fn id(&self) -> &ChangeRequestId {
        match self {
            ChangeRequestEvent::Created { id, .. } => id,
            ChangeRequestEvent::CodePushed { id, .. } => id,
            ChangeRequestEvent::PlanRequested { id, .. } => id,
            ChangeRequestEvent::CodePlanned { id, .. } => id,
            ChangeRequestEvent::ApplyRequested { id, .. } => id,
            ChangeRequestEvent::CodeApplied { id, .. } => id,
            ChangeRequestEvent::CodeMerged { id, .. } => id,
        }
    }

    /// When the event happened, as assigned by the caller's clock
    pub fn happened_at(&self) -> DateTime<Utc> {
        match self {
            ChangeRequestEvent::Created { happened_at, .. } => *happened_at,
            ChangeRequestEvent::CodePushed { happened_at, .. } => *happened_at,
            ChangeRequestEvent::PlanRequested { happened_at, .. } => *happened_at,
            ChangeRequestEvent::CodePlanned { happened_at, .. } => *happened_at,
            ChangeRequestEvent::ApplyRequested { happened_at, .. } => *happened_at,
            ChangeRequestEvent::CodeApplied { happened_at, .. } => *happened_at,
            ChangeRequestEvent::CodeMerged { happened_at, .. } => *happened_at,
        }
    }

    /// Event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            ChangeRequestEvent::Created { .. } => "Created",
            ChangeRequestEvent::CodePushed { .. } => "CodePushed",
            ChangeRequestEvent::PlanRequested { .. } => "PlanRequested",
            ChangeRequestEvent::CodePlanned { .. } => "CodePlanned",
            ChangeRequestEvent::ApplyRequested { .. } => "ApplyRequested",
            ChangeRequestEvent::CodeApplied { .. } => "CodeApplied",
            ChangeRequestEvent::CodeMerged { .. } => "CodeMerged",
        }
    }
}

// ============================================================================
// Event Constructors
// ============================================================================

impl ChangeRequestEvent {
    pub fn created(
        id: ChangeRequestId,
        happened_at: DateTime<Utc>,
        change_request_url: String,
        git_change_context: GitChangeContext,
        source_scm_type: ScmType,
    ) -> Self {
        Self::Created {
            id,
            happened_at,
            change_request_url,
            git_change_context,
            source_scm_type,
        }
    }

    pub fn code_pushed(id: ChangeRequestId, happened_at: DateTime<Utc>) -> Self {
        Self::CodePushed { id, happened_at }
    }

    pub fn plan_requested(id: ChangeRequestId, happened_at: DateTime<Utc>) -> Self {
        Self::PlanRequested { id, happened_at }
    }

    pub fn code_planned(
        id: ChangeRequestId,
        happened_at: DateTime<Utc>,
        output_plan: String,
        success: bool,
    ) -> Self {
        Self::CodePlanned {
            id,
            happened_at,
            output_plan,
            success,
        }
    }

    pub fn apply_requested(id: ChangeRequestId, happened_at: DateTime<Utc>) -> Self {
        Self::ApplyRequested { id, happened_at }
    }

    pub fn code_applied(
        id: ChangeRequestId,
        happened_at: DateTime<Utc>,
        output_apply: String,
        success: bool,
    ) -> Self {
        Self::CodeApplied {
            id,
            happened_at,
            output_apply,
            success,
        }
    }

    pub fn code_merged(id: ChangeRequestId, happened_at: DateTime<Utc>) -> Self {
        Self::CodeMerged { id, happened_at }
    }
}
