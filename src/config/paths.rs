//! Cross-platform service paths using the `dirs` crate.
//!
//! Config dir (settings):
//!   Linux:   ~/.config/onboarding-media/
//!   macOS:   ~/Library/Application Support/onboarding-media/
//!
//! Data dir (record snapshot, local media):
//!   Linux:   ~/.local/share/onboarding-media/
//!   macOS:   ~/Library/Application Support/onboarding-media/

use std::path::PathBuf;

/// Holds all resolved service directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// JSON snapshot of the onboarding video table.
    pub store_file: PathBuf,
    /// Root of the local object storage backend.
    pub media_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "onboarding-media";

    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
            store_file: data_dir.join("onboarding-videos.json"),
            media_dir: data_dir.join("media"),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
