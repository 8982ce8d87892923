// Copyright 2025 Cowboy AI, LLC.

//! Event store for change request events
//!
//! Provides a durable, append-only, per-stream ordered log keyed by
//! [`ChangeRequestId`], with:
//! - Optimistic concurrency on stream version
//! - Stream replay for state rehydration
//! - An in-memory implementation for hosting and tests
//!
//! Appends are committed atomically per stream; concurrent writers racing on
//! the same stream lose with a [`EventStoreError::VersionConflict`] and must
//! re-read, re-decide and retry. This is the per-identifier serialization
//! the pure domain core assumes as a precondition.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

use changeflow_domain::{ChangeRequestEvent, ChangeRequestId};

/// Error types for event store operations
#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("version conflict on stream {stream}: expected {expected}, actual {actual}")]
    VersionConflict {
        stream: ChangeRequestId,
        expected: u64,
        actual: u64,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for event store operations
pub type Result<T> = std::result::Result<T, EventStoreError>;

/// Stored event with stream metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEvent {
    /// Event sequence number within the stream, starting at 1
    pub sequence: u64,

    /// When the store accepted the event
    pub recorded_at: DateTime<Utc>,

    /// Event type name
    pub event_type: String,

    /// The domain event itself
    pub event: ChangeRequestEvent,
}

/// Trait for event store operations
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Append events to a stream
    ///
    /// `expected_version` is the stream version the caller based its decision
    /// on (0 for a new stream). Returns the new stream version.
    async fn append(
        &self,
        id: &ChangeRequestId,
        expected_version: u64,
        events: Vec<ChangeRequestEvent>,
    ) -> Result<u64>;

    /// Read the full ordered event stream for a change request
    async fn read_stream(&self, id: &ChangeRequestId) -> Result<Vec<ChangeRequestEvent>>;

    /// Current version (event count) of a stream; 0 if never written
    async fn stream_version(&self, id: &ChangeRequestId) -> Result<u64>;
}

/// In-memory event store
///
/// Stream-per-key map guarded by a single lock; good enough for hosting the
/// aggregate in tests and single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    streams: RwLock<HashMap<ChangeRequestId, Vec<StoredEvent>>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the stored envelopes, including sequence numbers
    pub async fn read_stored(&self, id: &ChangeRequestId) -> Vec<StoredEvent> {
        self.streams
            .read()
            .await
            .get(id)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append(
        &self,
        id: &ChangeRequestId,
        expected_version: u64,
        events: Vec<ChangeRequestEvent>,
    ) -> Result<u64> {
        let mut streams = self.streams.write().await;
        let stream = streams.entry(*id).or_default();

        let actual = stream.len() as u64;
        if actual != expected_version {
            return Err(EventStoreError::VersionConflict {
                stream: *id,
                expected: expected_version,
                actual,
            });
        }

        let recorded_at = Utc::now();
        for event in events {
            let sequence = stream.len() as u64 + 1;
            debug!(
                stream = %id,
                sequence,
                event_type = event.event_type(),
                "appending event"
            );
            stream.push(StoredEvent {
                sequence,
                recorded_at,
                event_type: event.event_type().to_string(),
                event,
            });
        }

        Ok(stream.len() as u64)
    }

    async fn read_stream(&self, id: &ChangeRequestId) -> Result<Vec<ChangeRequestEvent>> {
        let streams = self.streams.read().await;
        Ok(streams
            .get(id)
            .map(|stored| stored.iter().map(|s| s.event.clone()).collect())
            .unwrap_or_default())
    }

    async fn stream_version(&self, id: &ChangeRequestId) -> Result<u64> {
        let streams = self.streams.read().await;
        Ok(streams.get(id).map(|s| s.len() as u64).unwrap_or(0))
    }
}
