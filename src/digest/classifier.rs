//! Over 2.5 goals likelihood from two teams' scoring rates.
//!
//! The expected goal total of a match is taken as the plain sum of both
//! teams' average goals scored per match, then bucketed into three tiers
//! with inclusive lower bounds.

use std::fmt;

/// Summed rate at or above which Over 2.5 is "Likely".
pub const LIKELY_THRESHOLD: f64 = 2.5;
/// Summed rate at or above which Over 2.5 is "Very Likely".
pub const VERY_LIKELY_THRESHOLD: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Unlikely,
    Likely,
    VeryLikely,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::VeryLikely => "Very Likely",
            Tier::Likely => "Likely",
            Tier::Unlikely => "Unlikely",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Tier::VeryLikely => "🔥",
            Tier::Likely => "✅",
            Tier::Unlikely => "❌",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// home rate + away rate
    pub sum: f64,
    pub tier: Tier,
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1} goals)", self.tier, self.sum)
    }
}

pub fn classify(home_rate: f64, away_rate: f64) -> Prediction {
    let sum = home_rate + away_rate;
    let tier = if sum >= VERY_LIKELY_THRESHOLD {
        Tier::VeryLikely
    } else if sum >= LIKELY_THRESHOLD {
        Tier::Likely
    } else {
        Tier::Unlikely
    };
    Prediction { sum, tier }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sum_is_exact() {
        let p = classify(1.6, 1.0);
        assert_eq!(p.sum, 1.6 + 1.0);
    }

    #[test]
    fn test_likely_boundary_is_inclusive() {
        let p = classify(1.25, 1.25);
        assert_relative_eq!(p.sum, 2.5, epsilon = 1e-12);
        assert_eq!(p.tier, Tier::Likely);
    }

    #[test]
    fn test_very_likely_boundary_is_inclusive() {
        let p = classify(1.5, 1.5);
        assert_relative_eq!(p.sum, 3.0, epsilon = 1e-12);
        assert_eq!(p.tier, Tier::VeryLikely);
    }

    #[test]
    fn test_unlikely() {
        let p = classify(1.0, 1.0);
        assert_eq!(p.sum, 2.0);
        assert_eq!(p.tier, Tier::Unlikely);
        assert_eq!(classify(0.0, 0.0).tier, Tier::Unlikely);
    }

    #[test]
    fn test_just_below_boundaries() {
        assert_eq!(classify(1.2, 1.29).tier, Tier::Unlikely);
        assert_eq!(classify(1.5, 1.49).tier, Tier::Likely);
    }

    #[test]
    fn test_tiers_are_ordered() {
        assert!(Tier::VeryLikely > Tier::Likely);
        assert!(Tier::Likely > Tier::Unlikely);
    }

    #[test]
    fn test_display_rounds_to_one_decimal() {
        assert_eq!(classify(1.6, 1.0).to_string(), "✅ Likely (2.6 goals)");
        assert_eq!(classify(2.0, 0.2).to_string(), "❌ Unlikely (2.2 goals)");
        assert_eq!(classify(1.84, 1.33).to_string(), "🔥 Very Likely (3.2 goals)");
    }
}
