//! Speech synthesis for onboarding narration.
//!
//! * [`SpeechSynthesizer`] — async trait over a TTS vendor.
//! * [`ElevenLabsSynthesizer`] — the production backend.

pub mod elevenlabs;

use async_trait::async_trait;
use thiserror::Error;

use crate::tier::VoiceProfile;

pub use elevenlabs::ElevenLabsSynthesizer;

pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("speech vendor is not configured (missing API key)")]
    NotConfigured,

    #[error("TTS request failed: {0}")]
    Request(String),

    #[error("TTS request timed out")]
    Timeout,

    #[error("speech vendor returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("speech vendor returned no audio")]
    EmptyAudio,
}

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TtsError::Timeout
        } else {
            TtsError::Request(e.to_string())
        }
    }
}

/// Converts text to audio bytes with a given voice.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &VoiceProfile) -> Result<Vec<u8>, TtsError>;
}
