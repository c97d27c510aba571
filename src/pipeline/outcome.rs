//! Pipeline results and errors.

use std::fmt;

use thiserror::Error;

use crate::llm::LlmError;
use crate::storage::StorageError;
use crate::store::StoreError;
use crate::tts::TtsError;
use crate::video::{OnboardingVideoRecord, RecordError};

// ---------------------------------------------------------------------------
// Step
// ---------------------------------------------------------------------------

/// The three generation steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Script,
    Audio,
    Captions,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::Script => "script",
            Step::Audio => "audio",
            Step::Captions => "captions",
        })
    }
}

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors surfaced to the caller of the pipeline.
///
/// Step failures carry the step name so the message stored on the record is
/// self-describing.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad request input (unknown tier key).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A vendor call failed or returned unusable content.
    #[error("{step} step failed: {message}")]
    Upstream { step: Step, message: String },

    /// Uploading an asset failed.
    #[error("{step} upload failed: {message}")]
    Storage { step: Step, message: String },

    /// Vendor credentials are missing.
    #[error("{step} step is not configured: {message}")]
    NotConfigured { step: Step, message: String },

    /// Another run restarted the record while this one was working.
    #[error("generation superseded: {0}")]
    Conflict(String),

    /// The record store failed.
    #[error("record store error: {0}")]
    Store(#[source] StoreError),
}

impl PipelineError {
    pub(crate) fn from_llm(e: LlmError) -> Self {
        match e {
            LlmError::NotConfigured => PipelineError::NotConfigured {
                step: Step::Script,
                message: e.to_string(),
            },
            other => PipelineError::Upstream {
                step: Step::Script,
                message: other.to_string(),
            },
        }
    }

    pub(crate) fn from_tts(e: TtsError) -> Self {
        match e {
            TtsError::NotConfigured => PipelineError::NotConfigured {
                step: Step::Audio,
                message: e.to_string(),
            },
            other => PipelineError::Upstream {
                step: Step::Audio,
                message: other.to_string(),
            },
        }
    }

    pub(crate) fn from_storage(step: Step, e: StorageError) -> Self {
        match e {
            StorageError::NotConfigured(_) => PipelineError::NotConfigured {
                step,
                message: e.to_string(),
            },
            other => PipelineError::Storage {
                step,
                message: other.to_string(),
            },
        }
    }
}

impl From<StoreError> for PipelineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict { .. } => PipelineError::Conflict(e.to_string()),
            other => PipelineError::Store(other),
        }
    }
}

impl From<RecordError> for PipelineError {
    fn from(e: RecordError) -> Self {
        PipelineError::Store(StoreError::InvalidTransition(e))
    }
}

// ---------------------------------------------------------------------------
// GenerationOutcome
// ---------------------------------------------------------------------------

/// What a generation request resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// A ready record already existed for the current version.
    Cached(OnboardingVideoRecord),
    /// Another run owns the record; nothing was started.
    InProgress(OnboardingVideoRecord),
    /// This request ran the pipeline to `ready`.
    Generated(OnboardingVideoRecord),
}

impl GenerationOutcome {
    pub fn record(&self) -> &OnboardingVideoRecord {
        match self {
            GenerationOutcome::Cached(r)
            | GenerationOutcome::InProgress(r)
            | GenerationOutcome::Generated(r) => r,
        }
    }

    pub fn into_record(self) -> OnboardingVideoRecord {
        match self {
            GenerationOutcome::Cached(r)
            | GenerationOutcome::InProgress(r)
            | GenerationOutcome::Generated(r) => r,
        }
    }

    /// User-facing summary returned with the record.
    pub fn message(&self) -> &'static str {
        match self {
            GenerationOutcome::Cached(_) => "Onboarding video already generated",
            GenerationOutcome::InProgress(_) => "Onboarding video generation already in progress",
            GenerationOutcome::Generated(_) => "Onboarding video generated successfully",
        }
    }
}
