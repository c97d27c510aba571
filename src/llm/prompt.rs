//! Prompt builder for onboarding narration scripts.
//!
//! [`PromptBuilder::build_chat`] returns a `(system_msg, user_msg)` pair for
//! any OpenAI-compatible `/v1/chat/completions` endpoint. The template is
//! fixed; only the tier copy varies.

use crate::tier::Tier;

// ---------------------------------------------------------------------------
// System instruction
// ---------------------------------------------------------------------------

const SYSTEM_INSTRUCTION: &str = "\
You write onboarding narration for Dom Different, a fitness and discipline coaching programme.
Voice: direct, warm, no hype. Speak to one new member in the second person.

Rules:
1. The narration is read aloud by a single voice and lasts 45 to 75 seconds.
2. Split the narration into caption lines of at most 12 words each.
3. Captions must cover the narration in order, with no gaps longer than 0.5 s and no overlaps.
4. Times are seconds from the start of the audio, as decimal numbers.
5. Reply with ONLY a JSON object, no markdown and no commentary.";

const RESPONSE_FORMAT: &str = "
Response format:
{\"narration\": \"<full narration text>\", \"captions\": [{\"text\": \"<line>\", \"start\": 0.0, \"end\": 2.5}]}
";

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the narration prompt for one tier.
///
/// # Example
/// ```rust
/// use onboarding_media::llm::PromptBuilder;
/// use onboarding_media::tier::Tier;
///
/// let (system, user) = PromptBuilder::new(Tier::Elite).build_chat();
/// assert!(system.contains("JSON"));
/// assert!(user.contains("Dom Different Elite"));
/// ```
pub struct PromptBuilder {
    tier: Tier,
}

impl PromptBuilder {
    pub fn new(tier: Tier) -> Self {
        Self { tier }
    }

    /// Build a **(system_msg, user_msg)** pair.
    ///
    /// * `system_msg` — style rules and output contract.
    /// * `user_msg` — tier copy + response format.
    pub fn build_chat(&self) -> (String, String) {
        let profile = self.tier.profile();

        let mut user_msg = String::with_capacity(1024);
        user_msg.push_str(&format!(
            "Write the welcome narration for a new member of {}.\n",
            profile.display_name
        ));
        user_msg.push_str(&format!("What this plan is about: {}\n", profile.headline));
        user_msg.push_str("What they get:\n");
        for highlight in profile.highlights {
            user_msg.push_str(&format!("- {highlight}\n"));
        }
        user_msg.push_str("End by telling them their first step is to open the dashboard.\n");
        user_msg.push_str(RESPONSE_FORMAT);

        (SYSTEM_INSTRUCTION.to_string(), user_msg)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
