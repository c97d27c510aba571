//! In-process [`VideoStore`] + [`ConfigVersionSource`].
//!
//! All state lives behind a single `tokio` mutex, which is what makes
//! `claim` and `commit` atomic. When opened with a path, the whole state is
//! written to a JSON snapshot after every mutation and reloaded on open, so
//! a crash mid-pipeline leaves the partial record observable after restart.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::tier::Tier;
use crate::video::{OnboardingVideoRecord, RecordError, VideoStatus};

use super::{Claim, ConfigVersionSource, StoreError, VideoStore};

/// Versions start at 1 for tiers that were never bumped.
const INITIAL_VERSION: u32 = 1;

#[derive(Debug, Default)]
struct State {
    records: BTreeMap<(Tier, u32), OnboardingVideoRecord>,
    versions: BTreeMap<Tier, u32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    records: Vec<OnboardingVideoRecord>,
    versions: Vec<VersionEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct VersionEntry {
    tier: Tier,
    version: u32,
}

impl From<&State> for Snapshot {
    fn from(state: &State) -> Self {
        Snapshot {
            records: state.records.values().cloned().collect(),
            versions: state
                .versions
                .iter()
                .map(|(tier, version)| VersionEntry {
                    tier: *tier,
                    version: *version,
                })
                .collect(),
        }
    }
}

impl From<Snapshot> for State {
    fn from(snapshot: Snapshot) -> Self {
        State {
            records: snapshot
                .records
                .into_iter()
                .map(|r| ((r.tier, r.config_version), r))
                .collect(),
            versions: snapshot
                .versions
                .into_iter()
                .map(|e| (e.tier, e.version))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// LocalVideoStore
// ---------------------------------------------------------------------------

pub struct LocalVideoStore {
    state: Mutex<State>,
    snapshot_path: Option<PathBuf>,
}

impl LocalVideoStore {
    /// A store that forgets everything on drop.
    pub fn in_memory() -> Self {
        Self {
            state: Mutex::new(State::default()),
            snapshot_path: None,
        }
    }

    /// Open (or create) a store snapshotted at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let snapshot: Snapshot = serde_json::from_slice(&bytes)?;
                log::info!(
                    "store: loaded {} record(s) from {}",
                    snapshot.records.len(),
                    path.display()
                );
                State::from(snapshot)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => State::default(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            state: Mutex::new(state),
            snapshot_path: Some(path),
        })
    }

    async fn persist(&self, state: &State) -> Result<(), StoreError> {
        let Some(path) = &self.snapshot_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(&Snapshot::from(state))?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// Replace the row at `key`, rolling back if the snapshot write fails.
    async fn put(
        &self,
        state: &mut State,
        record: OnboardingVideoRecord,
    ) -> Result<(), StoreError> {
        let key = (record.tier, record.config_version);
        let previous = state.records.insert(key, record);
        if let Err(e) = self.persist(state).await {
            match previous {
                Some(p) => state.records.insert(key, p),
                None => state.records.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }
}

#[async_trait]
impl VideoStore for LocalVideoStore {
    async fn get(&self, tier: Tier, version: u32) -> Result<Option<OnboardingVideoRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.records.get(&(tier, version)).cloned())
    }

    async fn list(&self) -> Result<Vec<OnboardingVideoRecord>, StoreError> {
        let state = self.state.lock().await;
        Ok(state.records.values().cloned().collect())
    }

    async fn claim(&self, tier: Tier, version: u32, force: bool) -> Result<Claim, StoreError> {
        let mut state = self.state.lock().await;

        let mut record = match state.records.get(&(tier, version)) {
            None => OnboardingVideoRecord::new(tier, version),
            Some(existing) => {
                let busy_or_done = existing.status == VideoStatus::Ready
                    || existing.status.is_in_progress();
                if busy_or_done && !force {
                    return Ok(Claim::Existing(existing.clone()));
                }
                let mut r = existing.clone();
                r.restart();
                r
            }
        };

        record.advance(VideoStatus::GeneratingScript)?;
        log::debug!(
            "store: claimed {tier} v{version} attempt {} (force={force})",
            record.attempt
        );
        self.put(&mut state, record.clone()).await?;
        Ok(Claim::Started(record))
    }

    async fn commit(&self, from: VideoStatus, record: &OnboardingVideoRecord) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let (tier, version) = (record.tier, record.config_version);

        let stored = state
            .records
            .get(&(tier, version))
            .ok_or(StoreError::NotFound { tier, version })?;

        if stored.attempt != record.attempt || stored.status != from {
            return Err(StoreError::Conflict {
                tier,
                version,
                expected_attempt: record.attempt,
                expected_status: from,
                found_attempt: stored.attempt,
                found_status: stored.status,
            });
        }
        if !from.can_transition_to(record.status) {
            return Err(RecordError::IllegalTransition {
                from,
                to: record.status,
            }
            .into());
        }
        record.check_invariants()?;

        self.put(&mut state, record.clone()).await
    }
}

#[async_trait]
impl ConfigVersionSource for LocalVideoStore {
    async fn current(&self, tier: Tier) -> Result<u32, StoreError> {
        let state = self.state.lock().await;
        Ok(state.versions.get(&tier).copied().unwrap_or(INITIAL_VERSION))
    }

    async fn bump(&self, tier: Tier) -> Result<u32, StoreError> {
        let mut state = self.state.lock().await;
        let previous = state.versions.get(&tier).copied();
        let next = previous.unwrap_or(INITIAL_VERSION) + 1;
        state.versions.insert(tier, next);

        if let Err(e) = self.persist(&state).await {
            match previous {
                Some(v) => state.versions.insert(tier, v),
                None => state.versions.remove(&tier),
            };
            return Err(e);
        }
        log::info!("store: {tier} config version bumped to v{next}");
        Ok(next)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
