//! ElevenLabs text-to-speech backend.

use async_trait::async_trait;

use crate::config::TtsConfig;
use crate::tier::VoiceProfile;

use super::{SpeechSynthesizer, TtsError};

/// Calls `POST {base}/v1/text-to-speech/{voice_id}` with the whole script in
/// one request.
pub struct ElevenLabsSynthesizer {
    client: reqwest::Client,
    config: TtsConfig,
}

impl ElevenLabsSynthesizer {
    pub fn from_config(config: &TtsConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            voice_id
        )
    }

    fn request_body(&self, text: &str, voice: &VoiceProfile) -> serde_json::Value {
        serde_json::json!({
            "text": text,
            "model_id": self.config.model_id,
            "voice_settings": voice,
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsSynthesizer {
    async fn synthesize(&self, text: &str, voice: &VoiceProfile) -> Result<Vec<u8>, TtsError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(TtsError::NotConfigured)?;

        log::debug!(
            "tts: synthesizing {} chars with voice {}",
            text.chars().count(),
            voice.voice_id
        );

        let response = self
            .client
            .post(self.endpoint(voice.voice_id))
            .query(&[("output_format", self.config.output_format.as_str())])
            .header("xi-api-key", key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&self.request_body(text, voice))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TtsError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(TtsError::EmptyAudio);
        }
        Ok(bytes.to_vec())
    }
}
