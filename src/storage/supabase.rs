//! Supabase Storage backend.

use async_trait::async_trait;

use crate::config::StorageConfig;

use super::{validate_path, ObjectStorage, StorageError};

pub struct SupabaseStorage {
    client: reqwest::Client,
    config: StorageConfig,
}

impl SupabaseStorage {
    pub fn from_config(config: &StorageConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base(), self.config.bucket, path)
    }

    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base(),
            self.config.bucket,
            path
        )
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, StorageError> {
        validate_path(path)?;
        if self.config.base_url.is_empty() {
            return Err(StorageError::NotConfigured("missing storage base_url"));
        }
        let key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(StorageError::NotConfigured("missing storage API key"))?;

        log::debug!("storage: uploading {} bytes to {path}", bytes.len());
        let response = self
            .client
            .post(self.object_url(path))
            .bearer_auth(key)
            .header("apikey", key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(self.public_url(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(base_url: &str, key: Option<&str>) -> SupabaseStorage {
        SupabaseStorage::from_config(&StorageConfig {
            base_url: base_url.into(),
            api_key: key.map(str::to_string),
            bucket: "onboarding-videos".into(),
            ..StorageConfig::default()
        })
    }

    #[test]
    fn urls_use_bucket_and_path() {
        let s = storage("https://xyz.supabase.co/", Some("k"));
        assert_eq!(
            s.object_url("elite/audio-v2.mp3"),
            "https://xyz.supabase.co/storage/v1/object/onboarding-videos/elite/audio-v2.mp3"
        );
        assert_eq!(
            s.public_url("elite/audio-v2.mp3"),
            "https://xyz.supabase.co/storage/v1/object/public/onboarding-videos/elite/audio-v2.mp3"
        );
    }

    #[tokio::test]
    async fn missing_key_is_not_configured() {
        let s = storage("https://xyz.supabase.co", None);
        let err = s.upload("elite/a.mp3", vec![1], "audio/mpeg").await.unwrap_err();
        assert!(matches!(err, StorageError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn missing_base_url_is_not_configured() {
        let s = storage("", Some("k"));
        let err = s.upload("elite/a.mp3", vec![1], "audio/mpeg").await.unwrap_err();
        assert!(matches!(err, StorageError::NotConfigured(_)));
    }

    #[tokio::test]
    async fn bad_path_is_rejected_before_network() {
        let s = storage("https://xyz.supabase.co", Some("k"));
        let err = s.upload("../a.mp3", vec![1], "audio/mpeg").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidPath(_)));
    }
}
