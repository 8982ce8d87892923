// Copyright 2025 Cowboy AI, LLC.

//! Change Request Domain Commands
//!
//! Commands represent the intent to move a change request through its
//! lifecycle. They are validated by the decider against current state and
//! result in events being emitted; they never mutate state directly.

use super::value_objects::*;
use serde::{Deserialize, Serialize};

/// Commands accepted by the change request aggregate
///
/// Every command carries the identifier of the change request it targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeRequestCommand {
    /// Open a new change request from an SCM merge/pull request
    Create {
        id: ChangeRequestId,
        change_request_url: String,
        git_change_context: GitChangeContext,
        source_scm_type: ScmType,
    },

    /// Code was pushed or updated on the source branch
    PushCode { id: ChangeRequestId },

    /// Ask CI to run a plan for the current code
    RequestPlan { id: ChangeRequestId },

    /// CI finished a plan run; a failed plan is a valid result, not an error
    SubmitPlanResult {
        id: ChangeRequestId,
        output_plan: String,
        success: bool,
    },

    /// Ask CI to apply the last successful plan
    RequestApply { id: ChangeRequestId },

    /// CI finished an apply run
    SubmitApplyResult {
        id: ChangeRequestId,
        output_apply: String,
        success: bool,
    },

    /// Ask the SCM to merge the change request
    RequestMerge { id: ChangeRequestId },

    /// The SCM reported the merge outcome
    SubmitMergeResult { id: ChangeRequestId, success: bool },
}

impl ChangeRequestCommand {
    /// Identifier of the change request this command targets
    pub fn id(&self) -> &ChangeRequestId {
        match self {
            ChangeRequestCommand::Create { id, .. } => id,
            ChangeRequestCommand::PushCode { id } => id,
            ChangeRequestCommand::RequestPlan { id } => id,
            ChangeRequestCommand::SubmitPlanResult { id, .. } => id,
            ChangeRequestCommand::RequestApply { id } => id,
            ChangeRequestCommand::SubmitApplyResult { id, .. } => id,
            ChangeRequestCommand::RequestMerge { id } => id,
            ChangeRequestCommand::SubmitMergeResult { id, .. } => id,
        }
    }

    /// Command type as string
    pub fn command_type(&self) -> &'static str {
        match self {
            ChangeRequestCommand::Create { .. } => "Create",
            ChangeRequestCommand::PushCode { .. } => "PushCode",
            ChangeRequestCommand::RequestPlan { .. } => "RequestPlan",
            ChangeRequestCommand::SubmitPlanResult { .. } => "SubmitPlanResult",
            ChangeRequestCommand::RequestApply { .. } => "RequestApply",
            ChangeRequestCommand::SubmitApplyResult { .. } => "SubmitApplyResult",
            ChangeRequestCommand::RequestMerge { .. } => "RequestMerge",
            ChangeRequestCommand::SubmitMergeResult { .. } => "SubmitMergeResult",
        }
    }
}
