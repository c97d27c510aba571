//! Persistence boundary for onboarding video records.
//!
//! * [`VideoStore`] — record reads and conditional writes.
//! * [`ConfigVersionSource`] — the per-tier config version counter.
//! * [`LocalVideoStore`] — in-process implementation of both, optionally
//!   snapshotted to a JSON file.
//!
//! Every write goes through [`VideoStore::claim`] or [`VideoStore::commit`],
//! both of which are compare-and-swap operations: a run that lost its claim
//! to a forced restart cannot overwrite the newer attempt.

pub mod local;

use async_trait::async_trait;
use thiserror::Error;

use crate::tier::Tier;
use crate::video::{OnboardingVideoRecord, RecordError, VideoStatus};

pub use local::LocalVideoStore;

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
    /// No row exists for the key being committed.
    #[error("no onboarding video record for {tier} v{version}")]
    NotFound { tier: Tier, version: u32 },

    /// The stored row no longer matches what the writer expected.
    #[error(
        "record for {tier} v{version} changed concurrently \
         (expected attempt {expected_attempt} in {expected_status}, found attempt {found_attempt} in {found_status})"
    )]
    Conflict {
        tier: Tier,
        version: u32,
        expected_attempt: u32,
        expected_status: VideoStatus,
        found_attempt: u32,
        found_status: VideoStatus,
    },

    #[error("rejected write: {0}")]
    InvalidTransition(#[from] RecordError),

    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store snapshot is corrupt: {0}")]
    Snapshot(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Claim
// ---------------------------------------------------------------------------

/// Outcome of [`VideoStore::claim`].
#[derive(Debug, Clone, PartialEq)]
pub enum Claim {
    /// The caller now owns the row, which is in `generating_script`.
    Started(OnboardingVideoRecord),
    /// A ready or in-flight row exists and `force` was not set.
    Existing(OnboardingVideoRecord),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Relational store of [`OnboardingVideoRecord`]s keyed by
/// (tier, config version).
#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn get(&self, tier: Tier, version: u32) -> Result<Option<OnboardingVideoRecord>, StoreError>;

    /// All rows, ordered by tier then version.
    async fn list(&self) -> Result<Vec<OnboardingVideoRecord>, StoreError>;

    /// Atomically decide whether the caller may start a run.
    ///
    /// * absent → insert `queued`, advance to `generating_script`, `Started`
    /// * `ready` or in-progress, `force == false` → `Existing`
    /// * `failed`, or anything with `force == true` → restart, `Started`
    async fn claim(&self, tier: Tier, version: u32, force: bool) -> Result<Claim, StoreError>;

    /// Persist `record`, which must have been advanced from `from`.
    ///
    /// Fails with [`StoreError::Conflict`] unless the stored row has the same
    /// attempt and status `from`, and with [`StoreError::InvalidTransition`]
    /// when `from → record.status` is not an edge or the record breaks an
    /// invariant.
    async fn commit(&self, from: VideoStatus, record: &OnboardingVideoRecord) -> Result<(), StoreError>;
}

/// The external counter that versions tier content.
#[async_trait]
pub trait ConfigVersionSource: Send + Sync {
    async fn current(&self, tier: Tier) -> Result<u32, StoreError>;

    /// Increment and return the new version.
    async fn bump(&self, tier: Tier) -> Result<u32, StoreError>;
}
