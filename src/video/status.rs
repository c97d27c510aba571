//! Generation status state machine.
//!
//! The allowed edges are:
//!
//! ```text
//! Queued ──▶ GeneratingScript ──▶ GeneratingAudio ──▶ GeneratingCaptions ──▶ Ready
//!   │               │                    │                    │
//!   └───────────────┴────────────────────┴────────────────────┴──▶ Failed
//! ```
//!
//! Moving backwards is only possible through an explicit restart of the
//! record (see [`OnboardingVideoRecord::restart`](super::OnboardingVideoRecord::restart)).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Status of one onboarding video generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    Queued,
    GeneratingScript,
    GeneratingAudio,
    GeneratingCaptions,
    Ready,
    Failed,
}

impl VideoStatus {
    /// Returns `true` while a run owns the record.
    ///
    /// ```
    /// use onboarding_media::video::VideoStatus;
    ///
    /// assert!(VideoStatus::Queued.is_in_progress());
    /// assert!(VideoStatus::GeneratingAudio.is_in_progress());
    /// assert!(!VideoStatus::Ready.is_in_progress());
    /// assert!(!VideoStatus::Failed.is_in_progress());
    /// ```
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            VideoStatus::Queued
                | VideoStatus::GeneratingScript
                | VideoStatus::GeneratingAudio
                | VideoStatus::GeneratingCaptions
        )
    }

    /// The forward edge out of this status, if any.
    pub fn next(&self) -> Option<VideoStatus> {
        match self {
            VideoStatus::Queued => Some(VideoStatus::GeneratingScript),
            VideoStatus::GeneratingScript => Some(VideoStatus::GeneratingAudio),
            VideoStatus::GeneratingAudio => Some(VideoStatus::GeneratingCaptions),
            VideoStatus::GeneratingCaptions => Some(VideoStatus::Ready),
            VideoStatus::Ready | VideoStatus::Failed => None,
        }
    }

    /// Whether `self → to` is an edge of the transition table.
    pub fn can_transition_to(&self, to: VideoStatus) -> bool {
        if to == VideoStatus::Failed {
            return self.is_in_progress();
        }
        self.next() == Some(to)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoStatus::Queued => "queued",
            VideoStatus::GeneratingScript => "generating_script",
            VideoStatus::GeneratingAudio => "generating_audio",
            VideoStatus::GeneratingCaptions => "generating_captions",
            VideoStatus::Ready => "ready",
            VideoStatus::Failed => "failed",
        }
    }
}

impl Default for VideoStatus {
    fn default() -> Self {
        VideoStatus::Queued
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(VideoStatus::Queued),
            "generating_script" => Ok(VideoStatus::GeneratingScript),
            "generating_audio" => Ok(VideoStatus::GeneratingAudio),
            "generating_captions" => Ok(VideoStatus::GeneratingCaptions),
            "ready" => Ok(VideoStatus::Ready),
            "failed" => Ok(VideoStatus::Failed),
            other => Err(format!("unknown video status '{other}'")),
        }
    }
}
