//! Service settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.
//! Vendor secrets may also be supplied through the environment, which takes
//! precedence over the file (see [`AppConfig::apply_env`]).

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::analytics::PixelEntry;

use super::AppPaths;

pub const ENV_CONFIG_PATH: &str = "ONBOARDING_CONFIG";
pub const ENV_LLM_API_KEY: &str = "ONBOARDING_LLM_API_KEY";
pub const ENV_TTS_API_KEY: &str = "ONBOARDING_TTS_API_KEY";
pub const ENV_STORAGE_API_KEY: &str = "ONBOARDING_STORAGE_API_KEY";

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the HTTP listener binds to.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8787".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the script-writing LLM.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API (no trailing `/v1`).
    pub base_url: String,
    /// API key; `None` means the script step is not configured.
    pub api_key: Option<String>,
    /// Model identifier sent to the API (e.g. `"gpt-4o-mini"`).
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for the speech-synthesis vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Vendor model id (e.g. `"eleven_multilingual_v2"`).
    pub model_id: String,
    /// Vendor output format query parameter.
    pub output_format: String,
    pub timeout_secs: u64,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".into(),
            api_key: None,
            model_id: "eleven_multilingual_v2".into(),
            output_format: "mp3_44100_128".into(),
            timeout_secs: 120,
        }
    }
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

/// Which object storage backend uploads go to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Supabase Storage REST API.
    Supabase,
    /// A local directory, for development.
    Local,
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::Local
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Supabase project URL, e.g. `https://xyz.supabase.co`.
    pub base_url: String,
    /// Service-role key for Supabase uploads.
    pub api_key: Option<String>,
    pub bucket: String,
    /// Root directory for the local backend. `None` uses the data dir.
    pub local_dir: Option<PathBuf>,
    /// URL prefix returned for files written by the local backend.
    pub public_base_url: String,
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            base_url: String::new(),
            api_key: None,
            bucket: "onboarding-videos".into(),
            local_dir: None,
            public_base_url: "http://127.0.0.1:8787/media".into(),
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// StoreConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON snapshot of the record table. `None` uses the data dir;
    /// set `in_memory = true` to disable persistence.
    pub path: Option<PathBuf>,
    pub in_memory: bool,
}

// ---------------------------------------------------------------------------
// OnboardingConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingConfig {
    /// Optional poster image per tier key, attached when a video is ready.
    pub thumbnails: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// AnalyticsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub pixels: Vec<PixelEntry>,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level service configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use onboarding_media::config::AppConfig;
///
/// // Load (returns Default when file is missing), then apply env secrets.
/// let mut config = AppConfig::load().unwrap();
/// config.apply_env();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub tts: TtsConfig,
    pub storage: StorageConfig,
    pub store: StoreConfig,
    pub onboarding: OnboardingConfig,
    pub analytics: AnalyticsConfig,
}

impl AppConfig {
    /// Load from `$ONBOARDING_CONFIG` if set, else the platform
    /// `settings.toml`. A missing file yields `Default`.
    pub fn load() -> Result<Self> {
        match std::env::var_os(ENV_CONFIG_PATH) {
            Some(path) => Self::load_from(std::path::Path::new(&path)),
            None => Self::load_from(&AppPaths::new().settings_file),
        }
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override vendor keys from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Override vendor keys from `lookup`. Empty values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(ENV_LLM_API_KEY) {
            self.llm.api_key = Some(key);
        }
        if let Some(key) = get(ENV_TTS_API_KEY) {
            self.tts.api_key = Some(key);
        }
        if let Some(key) = get(ENV_STORAGE_API_KEY) {
            self.storage.api_key = Some(key);
        }
    }

    /// Snapshot path for the record store, or `None` when in memory.
    pub fn store_path(&self) -> Option<PathBuf> {
        if self.store.in_memory {
            return None;
        }
        Some(
            self.store
                .path
                .clone()
                .unwrap_or_else(|| AppPaths::new().store_file),
        )
    }

    /// Root directory for the local storage backend.
    pub fn local_storage_dir(&self) -> PathBuf {
        self.storage
            .local_dir
            .clone()
            .unwrap_or_else(|| AppPaths::new().media_dir)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
