//! Onboarding video generation pipeline.
//!
//! # Architecture
//!
//! ```text
//! POST /onboarding-video/generate
//!        │
//!        ▼
//! PipelineOrchestrator::generate(tier, force)
//!        │
//!        ├─ VideoStore::claim            → Cached / InProgress / Started
//!        │
//!        └─ Started
//!              │
//!              ├─ ScriptWriter::write_script             → generating_audio
//!              ├─ SpeechSynthesizer + ObjectStorage      → generating_captions
//!              └─ format_srt + ObjectStorage             → ready
//! ```
//!
//! Collaborators are trait objects so tests can swap in doubles for every
//! vendor and for the record store.

pub mod outcome;
pub mod runner;
pub mod steps;

#[cfg(test)]
pub(crate) mod mocks;

pub use outcome::{GenerationOutcome, PipelineError, Step};
pub use runner::PipelineOrchestrator;
