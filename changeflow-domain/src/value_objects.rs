// Copyright 2025 Cowboy AI, LLC.

//! Change Request Domain Value Objects
//!
//! These are the building blocks of the change request domain model.
//! All value objects are immutable once constructed.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Rejection reasons returned by the decider
///
/// A rejected command violates lifecycle ordering or targets a terminal or
/// nonexistent change request. Rejection is an expected outcome, not an
/// exception; callers that retry must distinguish it from a no-op acceptance
/// (which succeeds with an empty event list).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecideError {
    #[error("cannot decide, change request does not exist")]
    NotExist,

    #[error("change request already exists")]
    AlreadyExists,

    #[error("a successful plan is required before apply")]
    PlanRequired,

    #[error("an apply must be requested before submitting its result")]
    ApplyNotRequested,

    #[error("a successful apply is required before merge")]
    ApplyRequired,

    #[error("change request is already closed")]
    AlreadyClosed,
}

// ============================================================================
// Identity
// ============================================================================

/// Unique identifier for a change request
///
/// Derived deterministically from the originating SCM change-request URL via
/// SHA-256. Equality and hashing compare the raw digest bytes, never their
/// rendered form. Used as the event-stream key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeRequestId([u8; 32]);

impl ChangeRequestId {
    /// Derive an identifier from a change-request URL
    pub fn from_url(change_request_url: &str) -> Self {
        let digest = Sha256::digest(change_request_url.as_bytes());
        Self(digest.into())
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ChangeRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

// ============================================================================
// SCM Value Objects
// ============================================================================

/// Source-control systems this domain can originate from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScmType {
    Gitlab,
}

impl fmt::Display for ScmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScmType::Gitlab => write!(f, "gitlab"),
        }
    }
}

/// Git coordinates of a change request
///
/// Set once at creation and carried unchanged until the apply succeeds, at
/// which point the merging state no longer needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitChangeContext {
    pub repository_url: String,
    pub source_branch_ref: String,
    pub target_branch_ref: String,
}

/// Audit record of an inbound SCM webhook or API call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmRequest {
    pub scm_type: ScmType,
    pub request_date: chrono::DateTime<chrono::Utc>,
    pub raw_request: ScmRawRequest,
}

/// Raw body and headers of an SCM request, kept verbatim for audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmRawRequest {
    pub raw_body: String,
    pub raw_headers: BTreeMap<String, String>,
}
