//! Test doubles for the pipeline collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::llm::{LlmError, Script, ScriptWriter};
use crate::storage::{ObjectStorage, StorageError};
use crate::store::{Claim, ConfigVersionSource, LocalVideoStore, StoreError, VideoStore};
use crate::tier::{Tier, VoiceProfile};
use crate::tts::{SpeechSynthesizer, TtsError};
use crate::video::{CaptionLine, OnboardingVideoRecord, VideoStatus};

pub fn sample_script() -> Script {
    Script {
        narration: "Welcome to Dom Different. Let's get to work.".into(),
        captions: vec![
            CaptionLine::new("Welcome to Dom Different.", 0.0, 2.5),
            CaptionLine::new("Let's get to work.", 2.5, 4.0),
        ],
    }
}

// ---------------------------------------------------------------------------
// MockWriter
// ---------------------------------------------------------------------------

pub enum WriterMode {
    Ok,
    Fail,
    NotConfigured,
}

pub struct MockWriter {
    mode: WriterMode,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl MockWriter {
    fn with_mode(mode: WriterMode) -> Self {
        Self {
            mode,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn ok() -> Self {
        Self::with_mode(WriterMode::Ok)
    }

    pub fn failing() -> Self {
        Self::with_mode(WriterMode::Fail)
    }

    pub fn not_configured() -> Self {
        Self::with_mode(WriterMode::NotConfigured)
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::ok()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScriptWriter for MockWriter {
    async fn write_script(&self, _tier: Tier) -> Result<Script, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        match self.mode {
            WriterMode::Ok => Ok(sample_script()),
            WriterMode::Fail => Err(LlmError::Parse("no JSON object in model reply".into())),
            WriterMode::NotConfigured => Err(LlmError::NotConfigured),
        }
    }
}

// ---------------------------------------------------------------------------
// MockSpeech
// ---------------------------------------------------------------------------

pub struct MockSpeech {
    audio: Option<Vec<u8>>,
    voices: Mutex<Vec<String>>,
}

impl MockSpeech {
    pub fn ok(audio: Vec<u8>) -> Self {
        Self {
            audio: Some(audio),
            voices: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            audio: None,
            voices: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.voices.lock().unwrap().len()
    }

    pub fn voices(&self) -> Vec<String> {
        self.voices.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSpeech {
    async fn synthesize(&self, _text: &str, voice: &VoiceProfile) -> Result<Vec<u8>, TtsError> {
        self.voices.lock().unwrap().push(voice.voice_id.to_string());
        match &self.audio {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(TtsError::Status {
                status: 401,
                body: "invalid api key".into(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// MockStorage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Upload {
    pub path: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub struct MockStorage {
    /// Uploads whose path contains this fragment fail.
    fail_on: Option<&'static str>,
    uploads: Mutex<Vec<Upload>>,
}

impl MockStorage {
    pub fn ok() -> Self {
        Self {
            fail_on: None,
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self::failing_on("")
    }

    pub fn failing_on(fragment: &'static str) -> Self {
        Self {
            fail_on: Some(fragment),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStorage for MockStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        if let Some(fragment) = self.fail_on {
            if path.contains(fragment) {
                return Err(StorageError::Status {
                    status: 503,
                    body: "bucket unavailable".into(),
                });
            }
        }
        self.uploads.lock().unwrap().push(Upload {
            path: path.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        Ok(format!("mock://{path}"))
    }
}

// ---------------------------------------------------------------------------
// RecordingStore
// ---------------------------------------------------------------------------

/// Wraps [`LocalVideoStore`] and records every status it persists.
pub struct RecordingStore {
    inner: LocalVideoStore,
    statuses: Mutex<Vec<VideoStatus>>,
    /// Commits left to reject with an I/O error before writes succeed.
    commit_failures: AtomicUsize,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::failing_commits(0)
    }

    pub fn failing_commits(n: usize) -> Self {
        Self {
            inner: LocalVideoStore::in_memory(),
            statuses: Mutex::new(Vec::new()),
            commit_failures: AtomicUsize::new(n),
        }
    }

    pub fn statuses(&self) -> Vec<VideoStatus> {
        self.statuses.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoStore for RecordingStore {
    async fn get(&self, tier: Tier, version: u32) -> Result<Option<OnboardingVideoRecord>, StoreError> {
        self.inner.get(tier, version).await
    }

    async fn list(&self) -> Result<Vec<OnboardingVideoRecord>, StoreError> {
        self.inner.list().await
    }

    async fn claim(&self, tier: Tier, version: u32, force: bool) -> Result<Claim, StoreError> {
        let claim = self.inner.claim(tier, version, force).await?;
        if let Claim::Started(r) = &claim {
            self.statuses.lock().unwrap().push(r.status);
        }
        Ok(claim)
    }

    async fn commit(&self, from: VideoStatus, record: &OnboardingVideoRecord) -> Result<(), StoreError> {
        let fail = self
            .commit_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        self.inner.commit(from, record).await?;
        self.statuses.lock().unwrap().push(record.status);
        Ok(())
    }
}

#[async_trait]
impl ConfigVersionSource for RecordingStore {
    async fn current(&self, tier: Tier) -> Result<u32, StoreError> {
        self.inner.current(tier).await
    }

    async fn bump(&self, tier: Tier) -> Result<u32, StoreError> {
        self.inner.bump(tier).await
    }
}
