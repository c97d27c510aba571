//! Parsing of the model's narration reply into a [`Script`].
//!
//! Models occasionally wrap JSON in markdown fences or add a sentence before
//! it, so the parser extracts the outermost `{ … }` before deserializing.

use serde::Deserialize;

use crate::video::CaptionLine;

use super::writer::{LlmError, Script};

#[derive(Debug, Deserialize)]
struct RawScript {
    narration: String,
    captions: Vec<RawCaption>,
}

#[derive(Debug, Deserialize)]
struct RawCaption {
    text: String,
    #[serde(alias = "start_seconds")]
    start: f64,
    #[serde(alias = "end_seconds")]
    end: f64,
}

/// Slice from the first `{` to the last `}`.
fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

/// Parse and validate the model reply.
pub fn parse_script(content: &str) -> Result<Script, LlmError> {
    let json = extract_json_object(content)
        .ok_or_else(|| LlmError::Parse("no JSON object in model reply".into()))?;

    let raw: RawScript =
        serde_json::from_str(json).map_err(|e| LlmError::Parse(e.to_string()))?;

    let narration = raw.narration.trim().to_string();
    if narration.is_empty() {
        return Err(LlmError::Parse("narration is empty".into()));
    }
    if raw.captions.is_empty() {
        return Err(LlmError::Parse("no caption lines".into()));
    }

    let mut captions = Vec::with_capacity(raw.captions.len());
    let mut previous_end = 0.0_f64;
    for (i, c) in raw.captions.into_iter().enumerate() {
        let n = i + 1;
        let text = c.text.trim();
        if text.is_empty() {
            return Err(LlmError::Parse(format!("caption {n} has no text")));
        }
        if text.lines().any(|l| l.trim().is_empty()) {
            return Err(LlmError::Parse(format!("caption {n} contains a blank line")));
        }
        if !c.start.is_finite() || !c.end.is_finite() || c.start < 0.0 {
            return Err(LlmError::Parse(format!("caption {n} has an invalid start time")));
        }
        if c.end <= c.start {
            return Err(LlmError::Parse(format!(
                "caption {n} ends ({}) before it starts ({})",
                c.end, c.start
            )));
        }
        if c.start < previous_end {
            return Err(LlmError::Parse(format!(
                "caption {n} starts at {} before the previous line ends at {previous_end}",
                c.start
            )));
        }
        previous_end = c.end;
        captions.push(CaptionLine::new(text, c.start, c.end));
    }

    Ok(Script {
        narration,
        captions,
    })
}
