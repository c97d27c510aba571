//! Subscription tiers and the static per-tier tables.
//!
//! * [`Tier`] — the three plan keys accepted on the wire.
//! * [`TierProfile`] — marketing copy fed into the narration prompt.
//! * [`VoiceProfile`] — fixed voice id and prosody used for narration.

pub mod profile;
pub mod voice;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use profile::TierProfile;
pub use voice::VoiceProfile;

// ---------------------------------------------------------------------------
// TierError
// ---------------------------------------------------------------------------

/// Returned when a string is not one of the known plan keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown tier key '{0}' (expected one of: membership, coaching, elite)")]
pub struct TierError(pub String);

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

/// Subscription plan level.
///
/// ```
/// use onboarding_media::tier::Tier;
///
/// assert_eq!(Tier::from_key("coaching").unwrap(), Tier::Coaching);
/// assert!(Tier::from_key("platinum").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Entry plan.
    Membership,
    /// Mid plan with weekly check-ins.
    Coaching,
    /// Premium one-to-one plan.
    Elite,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Membership, Tier::Coaching, Tier::Elite];

    /// Parse a wire key. Keys are matched exactly after trimming whitespace.
    pub fn from_key(key: &str) -> Result<Self, TierError> {
        match key.trim() {
            "membership" => Ok(Tier::Membership),
            "coaching" => Ok(Tier::Coaching),
            "elite" => Ok(Tier::Elite),
            other => Err(TierError(other.to_string())),
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Tier::Membership => "membership",
            Tier::Coaching => "coaching",
            Tier::Elite => "elite",
        }
    }

    pub fn profile(&self) -> &'static TierProfile {
        profile::profile_for(*self)
    }

    pub fn voice(&self) -> &'static VoiceProfile {
        voice::voice_for(*self)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Tier {
    type Err = TierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tier::from_key(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_tier_round_trips_through_its_key() {
        for tier in Tier::ALL {
            assert_eq!(Tier::from_key(tier.key()).unwrap(), tier);
            assert_eq!(tier.to_string(), tier.key());
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = Tier::from_key("platinum").unwrap_err();
        assert_eq!(err, TierError("platinum".into()));
        assert!(err.to_string().contains("platinum"));
    }

    #[test]
    fn keys_are_case_sensitive() {
        assert!(Tier::from_key("Elite").is_err());
        assert_eq!(Tier::from_key("  elite ").unwrap(), Tier::Elite);
    }

    #[test]
    fn serde_uses_lowercase_key() {
        let json = serde_json::to_string(&Tier::Coaching).unwrap();
        assert_eq!(json, "\"coaching\"");
        let back: Tier = serde_json::from_str("\"membership\"").unwrap();
        assert_eq!(back, Tier::Membership);
    }
}
