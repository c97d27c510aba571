//! Process-wide pixel configuration cache.
//!
//! [`PixelCache::get_or_load`] initialises the cache at most once: callers
//! that arrive while a load is running wait on that same load instead of
//! starting their own. A failed load leaves the cache empty so the next
//! caller retries. [`PixelCache::reset`] drops the cached value.

use std::sync::{Arc, Mutex, OnceLock};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::OnceCell;

use super::pixels::PixelConfig;

static SHARED: OnceLock<PixelCache> = OnceLock::new();

#[derive(Debug, Clone, Error)]
#[error("failed to load pixel configuration: {0}")]
pub struct PixelLoadError(pub String);

/// Where pixel configuration comes from.
#[async_trait]
pub trait PixelConfigSource: Send + Sync {
    async fn load(&self) -> Result<PixelConfig, PixelLoadError>;
}

/// Serves a fixed configuration (from `settings.toml`).
pub struct StaticPixelSource {
    config: PixelConfig,
}

impl StaticPixelSource {
    pub fn new(config: PixelConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PixelConfigSource for StaticPixelSource {
    async fn load(&self) -> Result<PixelConfig, PixelLoadError> {
        Ok(self.config.clone())
    }
}

type Slot = Arc<OnceCell<Arc<PixelConfig>>>;

pub struct PixelCache {
    slot: Mutex<Slot>,
}

impl PixelCache {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(Arc::new(OnceCell::new())),
        }
    }

    /// The module-scoped instance used by the server.
    pub fn shared() -> &'static PixelCache {
        SHARED.get_or_init(PixelCache::new)
    }

    fn current_slot(&self) -> Slot {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&slot)
    }

    pub async fn get_or_load(
        &self,
        source: &dyn PixelConfigSource,
    ) -> Result<Arc<PixelConfig>, PixelLoadError> {
        let slot = self.current_slot();
        let config = slot
            .get_or_try_init(|| async {
                log::debug!("analytics: loading pixel configuration");
                source.load().await.map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(config))
    }

    /// The cached value, without loading.
    pub fn cached(&self) -> Option<Arc<PixelConfig>> {
        self.current_slot().get().cloned()
    }

    /// Forget the cached value. A load already in flight finishes into the
    /// old slot and is not observed by later callers.
    pub fn reset(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Arc::new(OnceCell::new());
    }
}

impl Default for PixelCache {
    fn default() -> Self {
        Self::new()
    }
}
