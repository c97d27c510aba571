//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each vendor and
//! subsystem, `AppPaths` for platform data directories, and TOML persistence
//! via `AppConfig::load` / `AppConfig::save_to`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AnalyticsConfig, AppConfig, LlmConfig, OnboardingConfig, ServerConfig, StorageBackend,
    StorageConfig, StoreConfig, TtsConfig,
};
