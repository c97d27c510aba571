//! Onboarding video records and their status machine.

pub mod record;
pub mod status;

pub use record::{CaptionLine, OnboardingVideoRecord, RecordError};
pub use status::VideoStatus;
