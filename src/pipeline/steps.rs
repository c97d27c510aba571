//! The three generation steps.
//!
//! Each step is a single attempt: one vendor call and/or one upload, with
//! errors mapped into [`PipelineError`] at this boundary.

use crate::captions::{format_srt, SRT_CONTENT_TYPE};
use crate::llm::{Script, ScriptWriter};
use crate::storage::{audio_path, captions_path, ObjectStorage};
use crate::tier::Tier;
use crate::tts::{SpeechSynthesizer, AUDIO_CONTENT_TYPE};
use crate::video::CaptionLine;

use super::outcome::{PipelineError, Step};

/// Narration + caption timings from the LLM.
pub async fn generate_script(writer: &dyn ScriptWriter, tier: Tier) -> Result<Script, PipelineError> {
    let script = writer
        .write_script(tier)
        .await
        .map_err(PipelineError::from_llm)?;
    log::debug!(
        "pipeline: {tier} script has {} chars, {} caption line(s)",
        script.narration.len(),
        script.captions.len()
    );
    Ok(script)
}

/// Synthesize the narration with the tier's voice and upload it.
/// Returns the public audio URL.
pub async fn generate_audio(
    speech: &dyn SpeechSynthesizer,
    storage: &dyn ObjectStorage,
    tier: Tier,
    version: u32,
    narration: &str,
) -> Result<String, PipelineError> {
    let audio = speech
        .synthesize(narration, tier.voice())
        .await
        .map_err(PipelineError::from_tts)?;
    log::debug!("pipeline: {tier} audio is {} bytes", audio.len());

    storage
        .upload(&audio_path(tier, version), audio, AUDIO_CONTENT_TYPE)
        .await
        .map_err(|e| PipelineError::from_storage(Step::Audio, e))
}

/// Format the caption lines as SubRip and upload them.
/// Returns the public captions URL.
pub async fn generate_captions(
    storage: &dyn ObjectStorage,
    tier: Tier,
    version: u32,
    lines: &[CaptionLine],
) -> Result<String, PipelineError> {
    let srt = format_srt(lines);
    storage
        .upload(&captions_path(tier, version), srt.into_bytes(), SRT_CONTENT_TYPE)
        .await
        .map_err(|e| PipelineError::from_storage(Step::Captions, e))
}
