use super::evaluator::BaseScore;
use crate::catalog::DistrictHistory;
use crate::models::labels::title_case;
use crate::models::RiskLevel;
use chrono::Month;

/// Month falls inside the district's usual outbreak season
pub const SEASON_BONUS: f64 = 0.20;

/// Month is a recorded peak outbreak month
pub const PEAK_MONTH_BONUS: f64 = 0.35;

pub fn risk_level_bonus(level: RiskLevel) -> f64 {
    match level {
        RiskLevel::High => 0.20,
        RiskLevel::Medium => 0.10,
        RiskLevel::Low => 0.0,
    }
}

/// Final score after the district history stage.
///
/// Only produced from a [`BaseScore`], and nothing accepts one back, so the
/// history bonus can be applied at most once per rule.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedScore {
    pub score: f64,
    pub reasons: Vec<String>,
}

impl From<BaseScore> for AdjustedScore {
    /// No district supplied: the rule score passes through unchanged
    fn from(base: BaseScore) -> Self {
        Self {
            score: base.score.clamp(0.0, 1.0),
            reasons: base.reasons,
        }
    }
}

/// Raise a rule score using the district's outbreak record for this crop and pest.
///
/// Season, peak-month and risk-level bonuses are additive and the result is
/// clamped to 1.0. Without a record the base score passes through unchanged.
pub fn apply_district_history(
    base: BaseScore,
    history: &DistrictHistory,
    district: &str,
    crop: &str,
    pest: &str,
    month: Month,
) -> AdjustedScore {
    let Some(entry) = history.lookup(district, crop, pest) else {
        return AdjustedScore::from(base);
    };

    let place = title_case(district.trim());
    let mut score = base.score;
    let mut reasons = base.reasons;

    if entry.in_season(month) {
        score += SEASON_BONUS;
        reasons.push(format!(
            "Historically occurs in {} during {}",
            place,
            month.name()
        ));
    }

    if entry.is_peak(month) {
        score += PEAK_MONTH_BONUS;
        reasons.push(format!("Peak outbreak month in {}", place));
    }

    let level_bonus = risk_level_bonus(entry.risk_level);
    if level_bonus > 0.0 {
        score += level_bonus;
        reasons.push(format!(
            "{} outbreak risk on record in {}",
            entry.risk_level, place
        ));
    }

    tracing::debug!(
        district = %place,
        crop,
        pest,
        base = base.score,
        boosted = score,
        "Applied district outbreak history"
    );

    AdjustedScore {
        score: score.clamp(0.0, 1.0),
        reasons,
    }
}
