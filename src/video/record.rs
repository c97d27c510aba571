//! The persisted onboarding video row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tier::Tier;

use super::status::VideoStatus;

// ---------------------------------------------------------------------------
// RecordError
// ---------------------------------------------------------------------------

/// A record mutation that would break the status machine or the field
/// invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("illegal status transition {from} -> {to}")]
    IllegalTransition { from: VideoStatus, to: VideoStatus },

    #[error("record invariant violated: {0}")]
    Invariant(&'static str),
}

// ---------------------------------------------------------------------------
// CaptionLine
// ---------------------------------------------------------------------------

/// One timed caption line produced by the script step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionLine {
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
}

impl CaptionLine {
    pub fn new(text: impl Into<String>, start_seconds: f64, end_seconds: f64) -> Self {
        Self {
            text: text.into(),
            start_seconds,
            end_seconds,
        }
    }
}

// ---------------------------------------------------------------------------
// OnboardingVideoRecord
// ---------------------------------------------------------------------------

/// One row per (tier, config version).
///
/// Outputs are filled in as steps complete. `attempt` is bumped each time a
/// run claims the row and, together with `status`, guards conditional writes
/// in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnboardingVideoRecord {
    pub tier: Tier,
    pub config_version: u32,
    pub status: VideoStatus,
    pub attempt: u32,
    pub script_text: Option<String>,
    #[serde(default)]
    pub caption_lines: Vec<CaptionLine>,
    pub audio_url: Option<String>,
    pub captions_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OnboardingVideoRecord {
    /// A fresh `queued` record for its first attempt.
    pub fn new(tier: Tier, config_version: u32) -> Self {
        let now = Utc::now();
        Self {
            tier,
            config_version,
            status: VideoStatus::Queued,
            attempt: 1,
            script_text: None,
            caption_lines: Vec::new(),
            audio_url: None,
            captions_url: None,
            thumbnail_url: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move along one edge of the status table.
    pub fn advance(&mut self, to: VideoStatus) -> Result<(), RecordError> {
        if !self.status.can_transition_to(to) {
            return Err(RecordError::IllegalTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Mark the current run as failed. Outputs produced so far are kept.
    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), RecordError> {
        self.advance(VideoStatus::Failed)?;
        self.error = Some(message.into());
        Ok(())
    }

    /// Start a new attempt from scratch: outputs and error are cleared,
    /// the attempt counter is bumped and the status returns to `queued`.
    pub fn restart(&mut self) {
        self.attempt += 1;
        self.status = VideoStatus::Queued;
        self.script_text = None;
        self.caption_lines.clear();
        self.audio_url = None;
        self.captions_url = None;
        self.thumbnail_url = None;
        self.error = None;
        self.updated_at = Utc::now();
    }

    pub fn check_invariants(&self) -> Result<(), RecordError> {
        if self.audio_url.is_some() && self.script_text.is_none() {
            return Err(RecordError::Invariant("audio_url set without script_text"));
        }
        if self.captions_url.is_some() && self.audio_url.is_none() {
            return Err(RecordError::Invariant("captions_url set without audio_url"));
        }
        match (self.status, self.error.is_some()) {
            (VideoStatus::Failed, false) => {
                return Err(RecordError::Invariant("failed record without error"))
            }
            (s, true) if s != VideoStatus::Failed => {
                return Err(RecordError::Invariant("error set on a non-failed record"))
            }
            _ => {}
        }
        if self.status == VideoStatus::Ready && self.captions_url.is_none() {
            return Err(RecordError::Invariant("ready record without captions_url"));
        }
        Ok(())
    }
}
