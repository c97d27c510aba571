//! Object storage for generated assets.
//!
//! * [`ObjectStorage`] — upload bytes, get back a public URL. Uploads
//!   overwrite whatever is already at the path.
//! * [`SupabaseStorage`] — Supabase Storage REST backend.
//! * [`LocalStorage`] — writes into a directory, for development.
//!
//! Asset paths are keyed by tier and config version, so regenerating the
//! same version overwrites in place.

pub mod local;
pub mod supabase;

use async_trait::async_trait;
use thiserror::Error;

use crate::tier::Tier;

pub use local::LocalStorage;
pub use supabase::SupabaseStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object storage is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("invalid object path '{0}'")]
    InvalidPath(String),

    #[error("upload request failed: {0}")]
    Request(String),

    #[error("object storage returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("local storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        StorageError::Request(e.to_string())
    }
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload `bytes` to `path` (upsert) and return the public URL.
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError>;
}

/// `{tier}/audio-v{version}.mp3`
pub fn audio_path(tier: Tier, version: u32) -> String {
    format!("{}/audio-v{}.mp3", tier.key(), version)
}

/// `{tier}/captions-v{version}.srt`
pub fn captions_path(tier: Tier, version: u32) -> String {
    format!("{}/captions-v{}.srt", tier.key(), version)
}

/// Rejects empty, absolute and parent-relative paths.
pub(crate) fn validate_path(path: &str) -> Result<(), StorageError> {
    let bad = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..");
    if bad {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}
