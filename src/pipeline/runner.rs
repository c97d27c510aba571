//! Pipeline orchestrator: drives script → audio → captions for one tier.
//!
//! # Flow
//!
//! ```text
//! generate(tier_key, force)
//!   ├─ Tier::from_key                      (InvalidArgument, no side effects)
//!   ├─ versions.current(tier)
//!   ├─ store.claim(tier, version, force)
//!   │     ├─ Existing(ready)       → Cached
//!   │     ├─ Existing(in progress) → InProgress
//!   │     └─ Started               [generating_script]
//!   ├─ generate_script  → commit   [generating_audio]
//!   ├─ generate_audio   → commit   [generating_captions]
//!   └─ generate_captions→ commit   [ready]        → Generated
//!
//! step or store write error → record.fail(msg) → commit [failed] → Err
//! ```
//!
//! Every commit is conditional on the attempt and status this run last
//! wrote, so a run that was superseded by a forced restart stops at its next
//! commit with [`PipelineError::Conflict`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::llm::ScriptWriter;
use crate::storage::ObjectStorage;
use crate::store::{Claim, ConfigVersionSource, VideoStore};
use crate::tier::Tier;
use crate::tts::SpeechSynthesizer;
use crate::video::{OnboardingVideoRecord, VideoStatus};

use super::outcome::{GenerationOutcome, PipelineError};
use super::steps::{generate_audio, generate_captions, generate_script};

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Ensures a `ready` onboarding video exists for a tier's current version.
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use onboarding_media::config::AppConfig;
/// use onboarding_media::llm::ApiScriptWriter;
/// use onboarding_media::pipeline::PipelineOrchestrator;
/// use onboarding_media::storage::LocalStorage;
/// use onboarding_media::store::LocalVideoStore;
/// use onboarding_media::tts::ElevenLabsSynthesizer;
///
/// # async fn example() {
/// let config = AppConfig::default();
/// let store = Arc::new(LocalVideoStore::in_memory());
/// let orchestrator = PipelineOrchestrator::new(
///     store.clone(),
///     store,
///     Arc::new(ApiScriptWriter::from_config(&config.llm)),
///     Arc::new(ElevenLabsSynthesizer::from_config(&config.tts)),
///     Arc::new(LocalStorage::new("media", "http://localhost/media")),
/// );
/// let outcome = orchestrator.generate("membership", false).await;
/// # }
/// ```
pub struct PipelineOrchestrator {
    store: Arc<dyn VideoStore>,
    versions: Arc<dyn ConfigVersionSource>,
    writer: Arc<dyn ScriptWriter>,
    speech: Arc<dyn SpeechSynthesizer>,
    storage: Arc<dyn ObjectStorage>,
    thumbnails: HashMap<Tier, String>,
}

impl PipelineOrchestrator {
    pub fn new(
        store: Arc<dyn VideoStore>,
        versions: Arc<dyn ConfigVersionSource>,
        writer: Arc<dyn ScriptWriter>,
        speech: Arc<dyn SpeechSynthesizer>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            store,
            versions,
            writer,
            speech,
            storage,
            thumbnails: HashMap::new(),
        }
    }

    /// Poster image attached to the record when it becomes ready.
    pub fn with_thumbnail(mut self, tier: Tier, url: impl Into<String>) -> Self {
        self.thumbnails.insert(tier, url.into());
        self
    }

    /// Generate (or return the existing) onboarding video for `tier_key`.
    pub async fn generate(
        &self,
        tier_key: &str,
        force: bool,
    ) -> Result<GenerationOutcome, PipelineError> {
        let tier =
            Tier::from_key(tier_key).map_err(|e| PipelineError::InvalidArgument(e.to_string()))?;
        let version = self.versions.current(tier).await?;

        let record = match self.store.claim(tier, version, force).await? {
            Claim::Existing(r) if r.status == VideoStatus::Ready => {
                log::debug!("pipeline: {tier} v{version} cache hit");
                return Ok(GenerationOutcome::Cached(r));
            }
            Claim::Existing(r) => {
                log::info!("pipeline: {tier} v{version} already {}, not starting", r.status);
                return Ok(GenerationOutcome::InProgress(r));
            }
            Claim::Started(r) => r,
        };

        log::info!(
            "pipeline: generating {tier} v{version} (attempt {}, force={force})",
            record.attempt
        );
        let record = self.run(record).await?;
        log::info!("pipeline: {tier} v{version} ready");
        Ok(GenerationOutcome::Generated(record))
    }

    /// Current-version record for a tier, if any.
    pub async fn current(&self, tier: Tier) -> Result<Option<OnboardingVideoRecord>, PipelineError> {
        let version = self.versions.current(tier).await?;
        Ok(self.store.get(tier, version).await?)
    }

    // -----------------------------------------------------------------------
    // Run
    // -----------------------------------------------------------------------

    async fn run(&self, mut record: OnboardingVideoRecord) -> Result<OnboardingVideoRecord, PipelineError> {
        let tier = record.tier;
        let version = record.config_version;

        // ── 1. Script ────────────────────────────────────────────────────
        let script = match generate_script(self.writer.as_ref(), tier).await {
            Ok(s) => s,
            Err(e) => return Err(self.abort(record, e).await),
        };
        record.script_text = Some(script.narration);
        record.caption_lines = script.captions;
        self.advance(&mut record, VideoStatus::GeneratingAudio).await?;

        // ── 2. Audio ─────────────────────────────────────────────────────
        let narration = record.script_text.clone().unwrap_or_default();
        let audio = generate_audio(
            self.speech.as_ref(),
            self.storage.as_ref(),
            tier,
            version,
            &narration,
        )
        .await;
        match audio {
            Ok(url) => record.audio_url = Some(url),
            Err(e) => return Err(self.abort(record, e).await),
        }
        self.advance(&mut record, VideoStatus::GeneratingCaptions).await?;

        // ── 3. Captions ──────────────────────────────────────────────────
        match generate_captions(self.storage.as_ref(), tier, version, &record.caption_lines).await {
            Ok(url) => record.captions_url = Some(url),
            Err(e) => return Err(self.abort(record, e).await),
        }
        record.thumbnail_url = self.thumbnails.get(&tier).cloned();
        self.advance(&mut record, VideoStatus::Ready).await?;

        Ok(record)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn advance(
        &self,
        record: &mut OnboardingVideoRecord,
        to: VideoStatus,
    ) -> Result<(), PipelineError> {
        let from = record.status;
        let mut next = record.clone();
        next.advance(to)?;
        if let Err(e) = self.store.commit(from, &next).await {
            // A superseded run must not touch the row again. Any other store
            // failure leaves the row at `from`, so mark it failed from there.
            return Err(match PipelineError::from(e) {
                conflict @ PipelineError::Conflict(_) => conflict,
                other => self.abort(record.clone(), other).await,
            });
        }
        *record = next;
        log::debug!("pipeline: {} v{} {from} -> {to}", record.tier, record.config_version);
        Ok(())
    }

    /// Persist the failure on the record and hand the error back.
    async fn abort(&self, mut record: OnboardingVideoRecord, err: PipelineError) -> PipelineError {
        let from = record.status;
        log::error!(
            "pipeline: {} v{} failed during {from}: {err}",
            record.tier,
            record.config_version
        );
        if let Err(e) = record.fail(err.to_string()) {
            log::warn!("pipeline: could not mark record failed: {e}");
            return err;
        }
        if let Err(e) = self.store.commit(from, &record).await {
            log::warn!("pipeline: could not persist failure: {e}");
        }
        err
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
