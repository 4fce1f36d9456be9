use super::alert::RiskLevel;
use super::pest_rule::parse_months;
use crate::error::{CropGuardError, Result};
use chrono::Month;
use serde::Deserialize;

/// Past outbreak pattern for one district + crop + pest.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictHistoryEntry {
    pub risk_level: RiskLevel,
    pub season: Vec<Month>,
    pub peak_months: Vec<Month>,
}

impl DistrictHistoryEntry {
    pub fn new(risk_level: RiskLevel) -> Self {
        Self {
            risk_level,
            season: Vec::new(),
            peak_months: Vec::new(),
        }
    }

    pub fn with_season(mut self, months: impl IntoIterator<Item = Month>) -> Self {
        self.season = months.into_iter().collect();
        self
    }

    pub fn with_peak_months(mut self, months: impl IntoIterator<Item = Month>) -> Self {
        self.peak_months = months.into_iter().collect();
        self
    }

    pub fn in_season(&self, month: Month) -> bool {
        self.season.contains(&month)
    }

    pub fn is_peak(&self, month: Month) -> bool {
        self.peak_months.contains(&month)
    }
}

/// On-disk shape of a history entry.
///
/// Bulletins export either a categorical `risk_level` or a continuous `prior`;
/// priors are bucketed into a level here so scoring only ever sees one form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryRecord {
    pub risk_level: Option<RiskLevel>,
    pub prior: Option<f64>,
    #[serde(default)]
    pub season: Vec<String>,
    #[serde(default)]
    pub peak_months: Vec<String>,
}

impl HistoryRecord {
    pub fn into_entry(self, context: &str) -> Result<DistrictHistoryEntry> {
        let invalid = |reason: String| CropGuardError::Catalog(format!("{context}: {reason}"));

        let risk_level = match (self.risk_level, self.prior) {
            (Some(level), None) => level,
            (None, Some(prior)) => {
                if !(0.0..=1.0).contains(&prior) {
                    return Err(invalid(format!("prior must be within 0-1, got {prior}")));
                }
                RiskLevel::from_score(prior)
            }
            (Some(_), Some(_)) => {
                return Err(invalid("set either risk_level or prior, not both".into()))
            }
            (None, None) => return Err(invalid("missing risk_level or prior".into())),
        };

        let season = parse_months(&self.season)
            .map_err(|bad| invalid(format!("season contains an unknown month '{bad}'")))?;
        let peak_months = parse_months(&self.peak_months)
            .map_err(|bad| invalid(format!("peak_months contains an unknown month '{bad}'")))?;

        Ok(DistrictHistoryEntry::new(risk_level)
            .with_season(season)
            .with_peak_months(peak_months))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(yaml: &str) -> Result<DistrictHistoryEntry> {
        let record: HistoryRecord = serde_yaml::from_str(yaml)?;
        record.into_entry("dharwad / cotton / Pink Bollworm")
    }

    #[test]
    fn categorical_entry() {
        let e = entry(
            r#"
risk_level: HIGH
season: ["September", "October", "November"]
peak_months: ["October"]
"#,
        )
        .unwrap();
        assert_eq!(e.risk_level, RiskLevel::High);
        assert!(e.in_season(Month::September));
        assert!(e.is_peak(Month::October));
        assert!(!e.is_peak(Month::September));
    }

    #[test]
    fn prior_is_bucketed_into_level() {
        assert_eq!(entry("prior: 0.9").unwrap().risk_level, RiskLevel::High);
        assert_eq!(entry("prior: 0.5").unwrap().risk_level, RiskLevel::Medium);
        assert_eq!(entry("prior: 0.1").unwrap().risk_level, RiskLevel::Low);
    }

    #[test]
    fn season_lists_are_optional() {
        let e = entry("risk_level: LOW").unwrap();
        assert!(e.season.is_empty());
        assert!(e.peak_months.is_empty());
    }

    #[test]
    fn prior_out_of_range_is_rejected() {
        assert!(entry("prior: 1.5").is_err());
        assert!(entry("prior: -0.1").is_err());
    }

    #[test]
    fn both_or_neither_forms_are_rejected() {
        assert!(entry("risk_level: HIGH\nprior: 0.8").is_err());
        assert!(entry(r#"season: ["July"]"#).is_err());
    }

    #[test]
    fn unknown_level_or_key_is_rejected() {
        assert!(entry("risk_level: SEVERE").is_err());
        assert!(entry("risk_level: HIGH\nseverity: 3").is_err());
    }

    #[test]
    fn month_numbers_and_abbreviations_are_rejected() {
        let err = entry("risk_level: HIGH\nseason: [\"8\"]").unwrap_err();
        assert!(err.to_string().contains("'8'"));
        assert!(entry("risk_level: HIGH\npeak_months: [\"aug\"]").is_err());
    }

    #[test]
    fn unknown_month_names_the_entry() {
        let err = entry("risk_level: HIGH\npeak_months: [\"Octobr\"]").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Pink Bollworm"));
        assert!(msg.contains("Octobr"));
    }
}
