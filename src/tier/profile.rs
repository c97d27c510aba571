//! Per-tier copy used to parameterize the narration prompt.

use super::Tier;

/// Static marketing copy for one tier.
#[derive(Debug, Clone, PartialEq)]
pub struct TierProfile {
    pub display_name: &'static str,
    pub headline: &'static str,
    pub highlights: &'static [&'static str],
}

const MEMBERSHIP: TierProfile = TierProfile {
    display_name: "Dom Different Membership",
    headline: "Build the daily discipline habit with structured training and nutrition.",
    highlights: &[
        "Weekly training programme in the dashboard",
        "Meal plans and macro targets",
        "Daily discipline check-in",
        "Community access",
    ],
};

const COACHING: TierProfile = TierProfile {
    display_name: "Dom Different Coaching",
    headline: "Everything in Membership plus weekly accountability from a coach.",
    highlights: &[
        "Personalised workout adjustments",
        "Weekly coach check-in and progress review",
        "AI chat support between check-ins",
        "Habit tracking with streaks",
    ],
};

const ELITE: TierProfile = TierProfile {
    display_name: "Dom Different Elite",
    headline: "One-to-one coaching with Dom for people who want the full transformation.",
    highlights: &[
        "Direct messaging with Dom",
        "Fully custom training and nutrition",
        "Fortnightly video calls",
        "Priority support",
    ],
};

pub(crate) fn profile_for(tier: Tier) -> &'static TierProfile {
    match tier {
        Tier::Membership => &MEMBERSHIP,
        Tier::Coaching => &COACHING,
        Tier::Elite => &ELITE,
    }
}
