//! Route handlers.

use std::path::PathBuf;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::analytics::{PixelConfig, PixelDispatch};
use crate::captions::SRT_CONTENT_TYPE;
use crate::pipeline::PipelineError;
use crate::storage::validate_path;
use crate::tier::Tier;
use crate::tts::AUDIO_CONTENT_TYPE;
use crate::video::OnboardingVideoRecord;

use super::error::ApiError;
use super::SharedState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub tier_key: String,
    #[serde(default)]
    pub force_regenerate: bool,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub video: OnboardingVideoRecord,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub tier: Tier,
    pub config_version: u32,
}

#[derive(Debug, Deserialize)]
pub struct TrackRequest {
    pub event: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub event: String,
    pub dispatches: Vec<PixelDispatch>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

fn parse_tier(key: &str) -> Result<Tier, ApiError> {
    Tier::from_key(key).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// ---------------------------------------------------------------------------
// Onboarding video
// ---------------------------------------------------------------------------

pub async fn generate(
    State(state): State<SharedState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, PipelineError> {
    let Json(req) = body.map_err(|e| PipelineError::InvalidArgument(e.body_text()))?;
    log::info!(
        "server: generate request tier={} force={}",
        req.tier_key,
        req.force_regenerate
    );

    let outcome = state
        .orchestrator
        .generate(&req.tier_key, req.force_regenerate)
        .await?;
    let message = outcome.message();
    Ok(Json(GenerateResponse {
        video: outcome.into_record(),
        message,
    }))
}

pub async fn get_video(
    State(state): State<SharedState>,
    Path(tier_key): Path<String>,
) -> Result<Json<OnboardingVideoRecord>, ApiError> {
    let tier = parse_tier(&tier_key)?;
    let version = state.versions.current(tier).await?;
    match state.store.get(tier, version).await? {
        Some(record) => Ok(Json(record)),
        None => Err(ApiError::NotFound(format!(
            "no onboarding video for {tier} v{version}"
        ))),
    }
}

pub async fn list_videos(
    State(state): State<SharedState>,
) -> Result<Json<Vec<OnboardingVideoRecord>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

pub async fn bump_version(
    State(state): State<SharedState>,
    Path(tier_key): Path<String>,
) -> Result<Json<VersionResponse>, ApiError> {
    let tier = parse_tier(&tier_key)?;
    let config_version = state.versions.bump(tier).await?;
    log::info!("server: {tier} config version bumped to {config_version}");
    Ok(Json(VersionResponse {
        tier,
        config_version,
    }))
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

pub async fn get_pixels(State(state): State<SharedState>) -> Result<Json<PixelConfig>, ApiError> {
    let config = state.pixel_cache.get_or_load(state.pixel_source.as_ref()).await?;
    Ok(Json(PixelConfig::clone(&config)))
}

pub async fn track(
    State(state): State<SharedState>,
    body: Result<Json<TrackRequest>, JsonRejection>,
) -> Result<Json<TrackResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if req.event.trim().is_empty() {
        return Err(ApiError::BadRequest("event must not be empty".into()));
    }

    let config = state.pixel_cache.get_or_load(state.pixel_source.as_ref()).await?;
    let dispatches = config.fan_out(&req.event, &req.params);
    log::debug!(
        "server: tracked '{}' to {} pixel(s)",
        req.event,
        dispatches.len()
    );
    Ok(Json(TrackResponse {
        event: req.event,
        dispatches,
    }))
}

// ---------------------------------------------------------------------------
// Media + health
// ---------------------------------------------------------------------------

/// Serves files written by [`crate::storage::LocalStorage`].
pub async fn media(
    State(state): State<SharedState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let Some(root) = state.media_root.as_ref() else {
        return Err(ApiError::NotFound("media is not served by this instance".into()));
    };
    validate_path(&path).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let file: PathBuf = root.join(&path);
    match tokio::fs::read(&file).await {
        Ok(bytes) => Ok(([(header::CONTENT_TYPE, content_type_for(&path))], bytes).into_response()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::NotFound(format!("no media at '{path}'")))
        }
        Err(e) => {
            log::warn!("server: reading {} failed: {e}", file.display());
            Ok(StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
    }
}

fn content_type_for(path: &str) -> &'static str {
    if path.ends_with(".mp3") {
        AUDIO_CONTENT_TYPE
    } else if path.ends_with(".srt") {
        SRT_CONTENT_TYPE
    } else {
        "application/octet-stream"
    }
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
