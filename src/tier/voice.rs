//! Static tier → narration voice lookup.

use serde::Serialize;

use super::Tier;

/// Voice id and prosody settings sent to the speech vendor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceProfile {
    #[serde(skip)]
    pub voice_id: &'static str,
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
    /// Speaking rate multiplier; 1.0 is the vendor default.
    pub speed: f32,
}

const MEMBERSHIP: VoiceProfile = VoiceProfile {
    voice_id: "pNInz6obpgDQGcFmaJgB",
    stability: 0.55,
    similarity_boost: 0.75,
    style: 0.25,
    use_speaker_boost: true,
    speed: 1.0,
};

const COACHING: VoiceProfile = VoiceProfile {
    voice_id: "TxGEqnHWrfWFTfGW9XjX",
    stability: 0.5,
    similarity_boost: 0.8,
    style: 0.35,
    use_speaker_boost: true,
    speed: 0.97,
};

const ELITE: VoiceProfile = VoiceProfile {
    voice_id: "VR6AewLTigWG4xSOukaG",
    stability: 0.45,
    similarity_boost: 0.85,
    style: 0.45,
    use_speaker_boost: true,
    speed: 0.94,
};

pub(crate) fn voice_for(tier: Tier) -> &'static VoiceProfile {
    match tier {
        Tier::Membership => &MEMBERSHIP,
        Tier::Coaching => &COACHING,
        Tier::Elite => &ELITE,
    }
}
