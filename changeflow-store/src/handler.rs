// Copyright 2025 Cowboy AI, LLC.

//! Command handler - the decide/persist cycle
//!
//! Runs the event-sourcing loop around the pure domain core: load the event
//! stream for the targeted change request, fold it into current state, ask
//! the decider, and append the emitted events with optimistic concurrency.
//!
//! A command that is accepted but has nothing left to do returns an empty
//! event list; callers must treat that differently from a rejection (no-op
//! is safe to retry forever, rejection is a precondition violation worth
//! investigating).

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use changeflow_domain::{decide, replay, ChangeRequestCommand, ChangeRequestEvent, DecideError};

use crate::clock::Clock;
use crate::event_store::{EventStore, EventStoreError};

/// Error types for command handling
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The decider rejected the command
    #[error("command rejected: {0}")]
    Rejected(#[from] DecideError),

    /// The event store failed, including losing an optimistic-concurrency
    /// race; the caller may re-read and retry
    #[error("event store error: {0}")]
    Store(#[from] EventStoreError),
}

/// Result type for command handling
pub type Result<T> = std::result::Result<T, HandlerError>;

/// Dispatches commands against the change request aggregate
pub struct CommandHandler<S, C> {
    store: Arc<S>,
    clock: C,
}

impl<S, C> CommandHandler<S, C>
where
    S: EventStore,
    C: Clock,
{
    pub fn new(store: Arc<S>, clock: C) -> Self {
        Self { store, clock }
    }

    /// Handle one command: load, fold, decide, append
    ///
    /// Returns the committed events; an empty vector is an accepted no-op.
    pub async fn handle(&self, command: &ChangeRequestCommand) -> Result<Vec<ChangeRequestEvent>> {
        let id = *command.id();

        let history = self.store.read_stream(&id).await?;
        let version = history.len() as u64;
        let state = replay(&history);

        debug!(
            stream = %id,
            command = command.command_type(),
            state = state.state_type(),
            version,
            "deciding"
        );

        let events = match decide(command, &state, self.clock.now()) {
            Ok(events) => events,
            Err(reason) => {
                warn!(
                    stream = %id,
                    command = command.command_type(),
                    state = state.state_type(),
                    %reason,
                    "command rejected"
                );
                return Err(HandlerError::Rejected(reason));
            }
        };

        if events.is_empty() {
            debug!(stream = %id, command = command.command_type(), "accepted no-op");
            return Ok(events);
        }

        self.store.append(&id, version, events.clone()).await?;
        info!(
            stream = %id,
            command = command.command_type(),
            committed = events.len(),
            "events committed"
        );

        Ok(events)
    }
}
