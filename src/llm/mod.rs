//! Script generation through an LLM gateway.
//!
//! This module provides:
//! * [`ScriptWriter`] — async trait implemented by all script backends.
//! * [`ApiScriptWriter`] — OpenAI-compatible REST backend.
//! * [`PromptBuilder`] — the fixed narration prompt, parameterized by tier.
//! * [`parse_script`] — turns the model reply into a validated [`Script`].
//! * [`LlmError`] — error variants for LLM operations.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use onboarding_media::config::AppConfig;
//! use onboarding_media::llm::{ApiScriptWriter, ScriptWriter};
//! use onboarding_media::tier::Tier;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let writer = ApiScriptWriter::from_config(&config.llm);
//!
//!     let script = writer.write_script(Tier::Membership).await.unwrap();
//!     println!("{}", script.narration);
//! }
//! ```

pub mod parse;
pub mod prompt;
pub mod writer;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use parse::parse_script;
pub use prompt::PromptBuilder;
pub use writer::{ApiScriptWriter, LlmError, Script, ScriptWriter};
