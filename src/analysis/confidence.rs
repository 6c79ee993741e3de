use serde::{Deserialize, Serialize};

pub const SCORE_HIGH: u8 = 85;
pub const SCORE_MEDIUM: u8 = 65;
pub const SCORE_LOW: u8 = 35;

/// Confidence bands used by every render surface.
///
/// The thresholds are part of the display contract: 70 and above reads as
/// strong, 40 to 69 as moderate, everything below as weak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Strong,
    Moderate,
    Weak,
}

impl ConfidenceTier {
    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceTier::Strong => "Strong",
            ConfidenceTier::Moderate => "Moderate",
            ConfidenceTier::Weak => "Weak",
        }
    }
}

/// Map the producer's confidence label to a display score.
/// Anything that is not "high" or "medium" counts as low.
pub fn score_from_label(label: &str) -> u8 {
    match label.trim().to_lowercase().as_str() {
        "high" => SCORE_HIGH,
        "medium" => SCORE_MEDIUM,
        _ => SCORE_LOW,
    }
}

pub fn tier_for_score(score: u8) -> ConfidenceTier {
    if score >= 70 {
        ConfidenceTier::Strong
    } else if score >= 40 {
        ConfidenceTier::Moderate
    } else {
        ConfidenceTier::Weak
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_scores() {
        assert_eq!(score_from_label("high"), 85);
        assert_eq!(score_from_label("HIGH"), 85);
        assert_eq!(score_from_label(" medium "), 65);
        assert_eq!(score_from_label("low"), 35);
        assert_eq!(score_from_label("unknown"), 35);
        assert_eq!(score_from_label(""), 35);
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(tier_for_score(100), ConfidenceTier::Strong);
        assert_eq!(tier_for_score(85), ConfidenceTier::Strong);
        assert_eq!(tier_for_score(70), ConfidenceTier::Strong);
        assert_eq!(tier_for_score(69), ConfidenceTier::Moderate);
        assert_eq!(tier_for_score(65), ConfidenceTier::Moderate);
        assert_eq!(tier_for_score(40), ConfidenceTier::Moderate);
        assert_eq!(tier_for_score(39), ConfidenceTier::Weak);
        assert_eq!(tier_for_score(0), ConfidenceTier::Weak);
    }

    #[test]
    fn test_labels_land_in_expected_tiers() {
        assert_eq!(tier_for_score(score_from_label("high")), ConfidenceTier::Strong);
        assert_eq!(tier_for_score(score_from_label("medium")), ConfidenceTier::Moderate);
        assert_eq!(tier_for_score(score_from_label("low")), ConfidenceTier::Weak);
    }
}
