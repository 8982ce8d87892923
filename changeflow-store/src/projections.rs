// Copyright 2025 Cowboy AI, LLC.

//! Event projections for building read models
//!
//! Projects the change request event stream into queryable views:
//! - Per-request lifecycle status
//! - Last plan and apply outputs
//! - Incremental, event-by-event updates
//!
//! The projection shadows the domain fold, so its status column can never
//! disagree with what replay would produce. Events for a stream whose
//! creation has not been seen are ignored, mirroring the applier's no-op
//! rule for inapplicable events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::hash_map;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use changeflow_domain::{
    apply, initial_state, ChangeRequestEvent, ChangeRequestId, ChangeRequestState, ScmType,
};

/// Lifecycle status exposed to readers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeRequestStatus {
    InProgress,
    Applyable,
    Applying,
    Merging,
    Closed,
}

impl ChangeRequestStatus {
    fn from_state(state: &ChangeRequestState) -> Option<Self> {
        match state {
            ChangeRequestState::NotExist => None,
            ChangeRequestState::InProgress { .. } => Some(Self::InProgress),
            ChangeRequestState::Applyable { .. } => Some(Self::Applyable),
            ChangeRequestState::Applying { .. } => Some(Self::Applying),
            ChangeRequestState::Merging { .. } => Some(Self::Merging),
            ChangeRequestState::Closed { .. } => Some(Self::Closed),
        }
    }
}

/// Outcome of the most recent plan run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub output: String,
    pub success: bool,
    pub at: DateTime<Utc>,
}

/// Read model for a change request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequestView {
    pub id: ChangeRequestId,
    pub change_request_url: String,
    pub source_scm_type: ScmType,
    pub status: ChangeRequestStatus,
    pub last_plan: Option<PlanSummary>,
    pub output_apply: Option<String>,
    pub updated_at: DateTime<Utc>,
}

struct Entry {
    state: ChangeRequestState,
    view: ChangeRequestView,
}

/// In-memory change request projection
#[derive(Default)]
pub struct ChangeRequestProjection {
    entries: RwLock<HashMap<ChangeRequestId, Entry>>,
}

impl ChangeRequestProjection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the read model
    pub async fn project(&self, event: &ChangeRequestEvent) {
        let mut entries = self.entries.write().await;
        let id = *event.id();

        let entry = match entries.entry(id) {
            hash_map::Entry::Occupied(occupied) => occupied.into_mut(),
            hash_map::Entry::Vacant(vacant) => match event {
                ChangeRequestEvent::Created {
                    change_request_url,
                    source_scm_type,
                    ..
                } => vacant.insert(Entry {
                    state: initial_state(),
                    view: ChangeRequestView {
                        id,
                        change_request_url: change_request_url.clone(),
                        source_scm_type: *source_scm_type,
                        status: ChangeRequestStatus::InProgress,
                        last_plan: None,
                        output_apply: None,
                        updated_at: event.happened_at(),
                    },
                }),
                _ => {
                    debug!(stream = %id, event_type = event.event_type(), "event for unknown change request ignored");
                    return;
                }
            },
        };

        match event {
            ChangeRequestEvent::CodePlanned {
                output_plan,
                success,
                ..
            } => {
                entry.view.last_plan = Some(PlanSummary {
                    output: output_plan.clone(),
                    success: *success,
                    at: event.happened_at(),
                });
            }
            ChangeRequestEvent::CodeApplied {
                output_apply,
                success: true,
                ..
            } => {
                entry.view.output_apply = Some(output_apply.clone());
            }
            _ => {}
        }

        entry.state = apply(std::mem::replace(&mut entry.state, initial_state()), event);
        if let Some(status) = ChangeRequestStatus::from_state(&entry.state) {
            entry.view.status = status;
        }
        entry.view.updated_at = event.happened_at();
    }

    /// Fetch the view for one change request
    pub async fn get(&self, id: &ChangeRequestId) -> Option<ChangeRequestView> {
        self.entries.read().await.get(id).map(|e| e.view.clone())
    }

    /// All known views
    pub async fn all(&self) -> Vec<ChangeRequestView> {
        self.entries
            .read()
            .await
            .values()
            .map(|e| e.view.clone())
            .collect()
    }

    /// Views currently in the given status
    pub async fn by_status(&self, status: ChangeRequestStatus) -> Vec<ChangeRequestView> {
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.view.status == status)
            .map(|e| e.view.clone())
            .collect()
    }
}
