//! SubRip (`.srt`) caption formatting.
//!
//! Each caption line becomes one block:
//!
//! ```text
//! 1
//! 00:00:00,000 --> 00:00:02,500
//! Welcome
//!
//! ```

use crate::video::CaptionLine;

pub const SRT_CONTENT_TYPE: &str = "application/x-subrip";

/// Format seconds as `HH:MM:SS,mmm`. Milliseconds are rounded to nearest;
/// negative or non-finite input is clamped to zero.
pub fn format_timestamp_srt(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{secs:02},{millis:03}")
}

/// Trimmed caption text with blank lines removed, so it cannot end the block
/// early. Single line breaks are kept as multi-line captions.
fn block_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render caption lines as a complete `.srt` document.
pub fn format_srt(lines: &[CaptionLine]) -> String {
    let mut output = String::new();

    for (i, line) in lines.iter().enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_timestamp_srt(line.start_seconds),
            format_timestamp_srt(line.end_seconds)
        ));
        output.push_str(&format!("{}\n\n", block_text(&line.text)));
    }

    output
}
