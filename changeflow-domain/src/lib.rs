// Copyright 2025 Cowboy AI, LLC.

//! Change Request Domain Module
//!
//! This crate models the lifecycle of a single infrastructure change request
//! (an SCM merge/pull request driving a plan → apply → merge pipeline) using
//! Domain-Driven Design and Event Sourcing principles.
//!
//! ## Architecture
//!
//! The whole domain is two pure functions over three closed data families:
//!
//! 1. **Decider**: [`decide`] validates a command against current state and
//!    either rejects it with a reason or emits an ordered event sequence
//! 2. **Applier**: [`apply`] folds one event into the next state; replaying
//!    the full history from [`initial_state`] reconstructs current state
//! 3. **Closed families**: commands, events and states are enums, so every
//!    new variant forces every consuming match site to be updated
//!
//! ## Lifecycle
//!
//! `NotExist → InProgress → Applyable → Applying → Merging → Closed`, with
//! strict ordering: no apply without a successful plan, no merge without a
//! successful apply. Redundant commands while an apply is in flight succeed
//! with an empty event sequence; ordering violations are rejected.
//!
//! ## Usage
//!
//! ```rust
//! use changeflow_domain::*;
//! use chrono::Utc;
//!
//! let url = "https://gitlab.example.com/infra/terraform/-/merge_requests/42";
//! let id = ChangeRequestId::from_url(url);
//!
//! let command = ChangeRequestCommand::Create {
//!     id,
//!     change_request_url: url.into(),
//!     git_change_context: GitChangeContext {
//!         repository_url: "git@gitlab.example.com:infra/terraform.git".into(),
//!         source_branch_ref: "feature/vpc".into(),
//!         target_branch_ref: "main".into(),
//!     },
//!     source_scm_type: ScmType::Gitlab,
//! };
//!
//! let events = decide(&command, &initial_state(), Utc::now()).unwrap();
//! let state = replay(&events);
//! assert_eq!(state.id(), Some(&id));
//! ```

pub mod aggregate;
pub mod commands;
pub mod events;
pub mod value_objects;

// Re-export commonly used types
pub use aggregate::{apply, decide, fold, initial_state, replay, ChangeRequestState, DecideResult};
pub use commands::ChangeRequestCommand;
pub use events::ChangeRequestEvent;
pub use value_objects::{
    ChangeRequestId, DecideError, GitChangeContext, ScmRawRequest, ScmRequest, ScmType,
};
