//! Application entry point: onboarding media service.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] (defaults on first run) and overlay env secrets.
//! 3. Open the record store (JSON snapshot, or in memory).
//! 4. Build the vendor clients: LLM script writer, TTS, object storage.
//! 5. Build the [`PipelineOrchestrator`] and the router state.
//! 6. Bind the listener and serve until the process is stopped.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use onboarding_media::{
    analytics::{PixelCache, PixelConfig, StaticPixelSource},
    config::{AppConfig, StorageBackend},
    llm::ApiScriptWriter,
    pipeline::PipelineOrchestrator,
    server::{self, AppState},
    storage::{LocalStorage, ObjectStorage, SupabaseStorage},
    store::LocalVideoStore,
    tier::Tier,
    tts::ElevenLabsSynthesizer,
};

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<LocalVideoStore>> {
    match config.store_path() {
        Some(path) => {
            let store = LocalVideoStore::open(&path)
                .await
                .with_context(|| format!("opening record store {}", path.display()))?;
            log::info!("Record store: {}", path.display());
            Ok(Arc::new(store))
        }
        None => {
            log::warn!("Record store is in memory; records are lost on restart");
            Ok(Arc::new(LocalVideoStore::in_memory()))
        }
    }
}

/// Returns the storage backend and, for the local backend, the directory to
/// serve under `/media`.
fn build_storage(config: &AppConfig) -> (Arc<dyn ObjectStorage>, Option<PathBuf>) {
    match config.storage.backend {
        StorageBackend::Supabase => {
            log::info!(
                "Object storage: Supabase bucket '{}' at {}",
                config.storage.bucket,
                config.storage.base_url
            );
            (Arc::new(SupabaseStorage::from_config(&config.storage)), None)
        }
        StorageBackend::Local => {
            let dir = config.local_storage_dir();
            log::info!("Object storage: local directory {}", dir.display());
            let storage = LocalStorage::new(dir.clone(), config.storage.public_base_url.clone());
            (Arc::new(storage), Some(dir))
        }
    }
}

fn build_orchestrator(
    config: &AppConfig,
    store: Arc<LocalVideoStore>,
    storage: Arc<dyn ObjectStorage>,
) -> PipelineOrchestrator {
    if config.llm.api_key.is_none() {
        log::warn!("LLM API key not set; generation will fail until it is configured");
    }
    if config.tts.api_key.is_none() {
        log::warn!("TTS API key not set; generation will fail until it is configured");
    }

    let mut orchestrator = PipelineOrchestrator::new(
        store.clone(),
        store,
        Arc::new(ApiScriptWriter::from_config(&config.llm)),
        Arc::new(ElevenLabsSynthesizer::from_config(&config.tts)),
        storage,
    );

    for (key, url) in &config.onboarding.thumbnails {
        match Tier::from_key(key) {
            Ok(tier) => orchestrator = orchestrator.with_thumbnail(tier, url.clone()),
            Err(e) => log::warn!("Ignoring thumbnail: {e}"),
        }
    }
    orchestrator
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Onboarding media service starting up");

    // 2. Configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    config.apply_env();

    // 3. Record store
    let store = open_store(&config).await?;

    // 4. Vendor clients
    let (storage, media_root) = build_storage(&config);

    // 5. Orchestrator + router state
    let orchestrator = Arc::new(build_orchestrator(&config, store.clone(), storage));
    let pixels = PixelConfig {
        pixels: config.analytics.pixels.clone(),
    };
    let state = Arc::new(AppState {
        orchestrator,
        store: store.clone(),
        versions: store,
        pixel_cache: PixelCache::shared(),
        pixel_source: Arc::new(StaticPixelSource::new(pixels)),
        media_root,
    });

    // 6. Serve
    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.server.bind_addr))?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, server::router(state))
        .await
        .context("server terminated")?;
    Ok(())
}
