//! Tier-specific onboarding media service.
//!
//! Generates a narrated onboarding video (script, voice-over audio, SRT
//! captions) per membership tier, caches it per tier config version, and
//! serves it over HTTP alongside the analytics pixel configuration.

pub mod analytics;
pub mod captions;
pub mod config;
pub mod llm;
pub mod pipeline;
pub mod server;
pub mod storage;
pub mod store;
pub mod tier;
pub mod tts;
pub mod video;
