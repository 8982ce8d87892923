// Copyright 2025 Cowboy AI, LLC.

//! Clock abstraction for event timestamping
//!
//! The domain never reads ambient time; the host injects the timestamp into
//! every decision. Production code uses [`SystemClock`], tests pin time with
//! [`FixedClock`].

use chrono::{DateTime, Utc};

/// Source of the timestamps stamped onto emitted events
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to a single instant, for deterministic tests
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
