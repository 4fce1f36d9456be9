use crate::models::RiskLevel;

pub const HIGH_RISK_CUTOFF: f64 = 0.75;
pub const MEDIUM_RISK_CUTOFF: f64 = 0.45;

/// Alerts scoring below this are dropped rather than reported as LOW
pub const MIN_CONFIDENCE: f64 = 0.40;

pub fn risk_tier(score: f64) -> RiskLevel {
    if score >= HIGH_RISK_CUTOFF {
        RiskLevel::High
    } else if score >= MEDIUM_RISK_CUTOFF {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Round to two decimals for display; tiers are taken from the rounded value
pub fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cutoffs_are_inclusive() {
        assert_eq!(risk_tier(1.0), RiskLevel::High);
        assert_eq!(risk_tier(0.75), RiskLevel::High);
        assert_eq!(risk_tier(0.74), RiskLevel::Medium);
        assert_eq!(risk_tier(0.45), RiskLevel::Medium);
        assert_eq!(risk_tier(0.44), RiskLevel::Low);
        assert_eq!(risk_tier(0.0), RiskLevel::Low);
    }

    #[test]
    fn tier_is_monotonic() {
        let tiers: Vec<RiskLevel> = (0..=100).map(|i| risk_tier(i as f64 / 100.0)).collect();
        assert!(tiers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn rounding_settles_float_noise() {
        let noisy = 0.20 + 0.35 + 0.20;
        assert_eq!(round_score(noisy), 0.75);
        assert_eq!(risk_tier(round_score(noisy)), RiskLevel::High);
        assert_eq!(round_score(2.0 / 3.0), 0.67);
        assert_eq!(round_score(0.444), 0.44);
    }

    #[test]
    fn min_confidence_sits_inside_low_tier() {
        assert_eq!(risk_tier(MIN_CONFIDENCE), RiskLevel::Low);
        assert_eq!(risk_tier(round_score(MIN_CONFIDENCE)), RiskLevel::Low);
    }
}
