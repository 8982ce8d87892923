// Copyright 2025 Cowboy AI, LLC.

//! Hosting infrastructure for the change request domain
//!
//! This crate is everything the pure domain core assumes from its host:
//! a durable, append-only, per-stream ordered event log, the
//! load → fold → decide → append cycle around it, an injected clock, and
//! read-model projections built from the committed events.
//!
//! Per-identifier serialization is enforced with optimistic concurrency on
//! stream version: a decision made against stale state loses the append and
//! must be retried against the fresh stream.

pub mod clock;
pub mod event_store;
pub mod handler;
pub mod projections;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use event_store::{EventStore, EventStoreError, MemoryEventStore, StoredEvent};
pub use handler::{CommandHandler, HandlerError};
pub use projections::{
    ChangeRequestProjection, ChangeRequestStatus, ChangeRequestView, PlanSummary,
};
