use super::labels::{normalize_label, parse_month_name};
use crate::error::{CropGuardError, Result};
use chrono::Month;
use serde::{Deserialize, Serialize};

/// Inclusive numeric band, e.g. a temperature range of 18-28°C.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub fn contains(&self, value: f64) -> bool {
        (self.low..=self.high).contains(&value)
    }
}

/// A single testable predicate within a pest rule.
///
/// Variants are declared in evaluation order: temperature, humidity,
/// rainfall, season, stage, soil. Rules keep their conditions sorted by
/// this order so reason strings come out the same way every time.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    TempAbove(f64),
    TempWithin(Band),
    HumidityAbove(f64),
    HumidityBelow(f64),
    RainfallAbove(f64),
    RainfallBelow(f64),
    RainfallWithin(Band),
    Season(Vec<Month>),
    Stage(Vec<String>),
    Soil(Vec<String>),
}

impl Condition {
    /// Position of this condition kind in the fixed evaluation order
    pub fn order(&self) -> u8 {
        match self {
            Condition::TempAbove(_) => 0,
            Condition::TempWithin(_) => 1,
            Condition::HumidityAbove(_) => 2,
            Condition::HumidityBelow(_) => 3,
            Condition::RainfallAbove(_) => 4,
            Condition::RainfallBelow(_) => 5,
            Condition::RainfallWithin(_) => 6,
            Condition::Season(_) => 7,
            Condition::Stage(_) => 8,
            Condition::Soil(_) => 9,
        }
    }
}

/// Validated rule for one crop + pest pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PestRule {
    pub conditions: Vec<Condition>,
    pub symptoms: String,
    pub preventive: String,
    pub corrective: String,
}

impl PestRule {
    pub fn new(mut conditions: Vec<Condition>) -> Self {
        conditions.sort_by_key(Condition::order);
        Self {
            conditions,
            symptoms: String::new(),
            preventive: String::new(),
            corrective: String::new(),
        }
    }

    pub fn with_symptoms(mut self, symptoms: impl Into<String>) -> Self {
        self.symptoms = symptoms.into();
        self
    }

    pub fn with_preventive(mut self, preventive: impl Into<String>) -> Self {
        self.preventive = preventive.into();
        self
    }

    pub fn with_corrective(mut self, corrective: impl Into<String>) -> Self {
        self.corrective = corrective.into();
        self
    }
}

/// On-disk shape of a rule. Unknown keys are rejected at load time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PestRuleRecord {
    pub temp_gt: Option<f64>,
    pub temp_range: Option<[f64; 2]>,
    pub humidity_gt: Option<f64>,
    pub humidity_lt: Option<f64>,
    pub rainfall_gt: Option<f64>,
    pub rainfall_lt: Option<f64>,
    pub rainfall_range: Option<[f64; 2]>,
    pub season: Option<Vec<String>>,
    pub stage: Option<Vec<String>>,
    pub soil: Option<Vec<String>>,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub preventive: String,
    #[serde(default)]
    pub corrective: String,
}

impl PestRuleRecord {
    /// Validate the record and convert it into a [`PestRule`].
    ///
    /// `context` identifies the rule (e.g. `paddy / Blast Disease`) in error messages.
    pub fn into_rule(self, context: &str) -> Result<PestRule> {
        let invalid =
            |key: &str, reason: String| CropGuardError::Catalog(format!("{context}: {key} {reason}"));

        let threshold = |key: &str, value: f64| -> Result<f64> {
            if value.is_finite() {
                Ok(value)
            } else {
                Err(invalid(key, format!("must be a finite number, got {value}")))
            }
        };
        let humidity = |key: &str, value: f64| -> Result<f64> {
            let value = threshold(key, value)?;
            if (0.0..=100.0).contains(&value) {
                Ok(value)
            } else {
                Err(invalid(key, format!("must be within 0-100%, got {value}")))
            }
        };
        let band = |key: &str, [low, high]: [f64; 2]| -> Result<Band> {
            let low = threshold(key, low)?;
            let high = threshold(key, high)?;
            if low > high {
                return Err(invalid(key, format!("lower bound {low} exceeds upper bound {high}")));
            }
            Ok(Band { low, high })
        };
        let labels = |key: &str, values: Vec<String>| -> Result<Vec<String>> {
            let normalized: Vec<String> = values.iter().map(|v| normalize_label(v)).collect();
            if normalized.is_empty() || normalized.iter().any(String::is_empty) {
                return Err(invalid(key, "must list at least one non-empty label".into()));
            }
            Ok(normalized)
        };

        let mut conditions = Vec::new();

        if let Some(v) = self.temp_gt {
            conditions.push(Condition::TempAbove(threshold("temp_gt", v)?));
        }
        if let Some(v) = self.temp_range {
            conditions.push(Condition::TempWithin(band("temp_range", v)?));
        }
        if let Some(v) = self.humidity_gt {
            conditions.push(Condition::HumidityAbove(humidity("humidity_gt", v)?));
        }
        if let Some(v) = self.humidity_lt {
            conditions.push(Condition::HumidityBelow(humidity("humidity_lt", v)?));
        }
        if let Some(v) = self.rainfall_gt {
            conditions.push(Condition::RainfallAbove(threshold("rainfall_gt", v)?));
        }
        if let Some(v) = self.rainfall_lt {
            conditions.push(Condition::RainfallBelow(threshold("rainfall_lt", v)?));
        }
        if let Some(v) = self.rainfall_range {
            conditions.push(Condition::RainfallWithin(band("rainfall_range", v)?));
        }
        if let Some(names) = self.season {
            if names.is_empty() {
                return Err(invalid("season", "must list at least one month".into()));
            }
            conditions.push(Condition::Season(parse_months(&names).map_err(|bad| {
                invalid("season", format!("contains an unknown month '{bad}'"))
            })?));
        }
        if let Some(v) = self.stage {
            conditions.push(Condition::Stage(labels("stage", v)?));
        }
        if let Some(v) = self.soil {
            conditions.push(Condition::Soil(labels("soil", v)?));
        }

        Ok(PestRule::new(conditions)
            .with_symptoms(self.symptoms)
            .with_preventive(self.preventive)
            .with_corrective(self.corrective))
    }
}

/// Parse a list of full month names. Returns the first bad entry on failure.
pub fn parse_months(names: &[String]) -> std::result::Result<Vec<Month>, String> {
    names
        .iter()
        .map(|name| parse_month_name(name).ok_or_else(|| name.clone()))
        .collect()
}
