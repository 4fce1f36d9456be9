use crate::models::labels::normalize_label;
use crate::models::{Condition, PestQuery, PestRule};
use chrono::Month;

/// Added when the farmer's symptom report mentions a word from the rule's symptoms
pub const SYMPTOM_MATCH_BONUS: f64 = 0.15;

pub const SYMPTOM_MATCH_REASON: &str = "Farmer symptom text matches pest profile";

/// Field observations for one crop, with the month already resolved.
///
/// Stage and soil labels are normalized and the symptom report is lowercased
/// once here so every rule compares against the same text.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub month: Month,
    pub temperature_c: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub rainfall_mm: Option<f64>,
    pub stage: Option<String>,
    pub soil_type: Option<String>,
    pub symptoms_text: Option<String>,
}

impl Observation {
    pub fn new(month: Month) -> Self {
        Self {
            month,
            temperature_c: None,
            humidity_percent: None,
            rainfall_mm: None,
            stage: None,
            soil_type: None,
            symptoms_text: None,
        }
    }

    pub fn from_query(query: &PestQuery, month: Month) -> Self {
        Self {
            month,
            temperature_c: query.temperature_c,
            humidity_percent: query.humidity_percent,
            rainfall_mm: query.rainfall_mm,
            stage: non_empty_label(query.stage.as_deref()),
            soil_type: non_empty_label(query.soil_type.as_deref()),
            symptoms_text: query
                .symptoms_text
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_lowercase),
        }
    }
}

fn non_empty_label(label: Option<&str>) -> Option<String> {
    label.map(normalize_label).filter(|l| !l.is_empty())
}

/// Rule-only score before any district history adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseScore {
    pub score: f64,
    pub reasons: Vec<String>,
    /// Conditions the observation supplied a value for
    pub applicable: usize,
    pub matched: usize,
}

enum Outcome {
    /// No observed value for this condition
    Skipped,
    Missed,
    Matched(String),
}

fn check(condition: &Condition, obs: &Observation) -> Outcome {
    let outcome = |hit: bool, reason: String| {
        if hit {
            Outcome::Matched(reason)
        } else {
            Outcome::Missed
        }
    };

    match condition {
        Condition::TempAbove(limit) => match obs.temperature_c {
            Some(t) => outcome(t > *limit, format!("Temperature {t}°C > {limit}°C")),
            None => Outcome::Skipped,
        },
        Condition::TempWithin(band) => match obs.temperature_c {
            Some(t) => outcome(
                band.contains(t),
                format!("Temperature {t}°C within {}–{}°C", band.low, band.high),
            ),
            None => Outcome::Skipped,
        },
        Condition::HumidityAbove(limit) => match obs.humidity_percent {
            Some(h) => outcome(h > *limit, format!("Humidity {h}% > {limit}%")),
            None => Outcome::Skipped,
        },
        Condition::HumidityBelow(limit) => match obs.humidity_percent {
            Some(h) => outcome(h < *limit, format!("Humidity {h}% < {limit}%")),
            None => Outcome::Skipped,
        },
        Condition::RainfallAbove(limit) => match obs.rainfall_mm {
            Some(r) => outcome(r > *limit, format!("Rainfall {r}mm > {limit}mm")),
            None => Outcome::Skipped,
        },
        Condition::RainfallBelow(limit) => match obs.rainfall_mm {
            Some(r) => outcome(r < *limit, format!("Rainfall {r}mm < {limit}mm")),
            None => Outcome::Skipped,
        },
        Condition::RainfallWithin(band) => match obs.rainfall_mm {
            Some(r) => outcome(
                band.contains(r),
                format!("Rainfall {r}mm within {}–{}mm", band.low, band.high),
            ),
            None => Outcome::Skipped,
        },
        Condition::Season(months) => outcome(
            months.contains(&obs.month),
            format!("Season risk in {}", obs.month.name()),
        ),
        Condition::Stage(stages) => match &obs.stage {
            Some(stage) => outcome(
                stages.contains(stage),
                format!("Crop stage risk: {stage}"),
            ),
            None => Outcome::Skipped,
        },
        Condition::Soil(soils) => match &obs.soil_type {
            Some(soil) => outcome(
                soils.contains(soil),
                format!("Soil type favours pest: {soil}"),
            ),
            None => Outcome::Skipped,
        },
    }
}

/// True when any word of the rule's symptom description appears in the report.
///
/// Words are the lowercased, whitespace-separated tokens of the description,
/// punctuation included, so `"clumps;"` only matches a report containing `"clumps;"`.
pub fn symptoms_match(rule_symptoms: &str, report_lowercase: &str) -> bool {
    rule_symptoms
        .to_lowercase()
        .split_whitespace()
        .any(|word| report_lowercase.contains(word))
}

/// Score one rule against an observation.
///
/// Conditions without an observed value are left out of the ratio entirely.
/// A rule with nothing applicable scores 0.0. The symptom bonus is added on
/// top and capped at 1.0. Reasons follow the rule's condition order, with
/// the symptom match last.
pub fn evaluate_rule(rule: &PestRule, obs: &Observation) -> BaseScore {
    let mut applicable = 0;
    let mut matched = 0;
    let mut reasons = Vec::new();

    for condition in &rule.conditions {
        match check(condition, obs) {
            Outcome::Skipped => {}
            Outcome::Missed => applicable += 1,
            Outcome::Matched(reason) => {
                applicable += 1;
                matched += 1;
                reasons.push(reason);
            }
        }
    }

    let mut score = if applicable > 0 {
        matched as f64 / applicable as f64
    } else {
        0.0
    };

    if let Some(report) = &obs.symptoms_text {
        if symptoms_match(&rule.symptoms, report) {
            score = (score + SYMPTOM_MATCH_BONUS).min(1.0);
            reasons.push(SYMPTOM_MATCH_REASON.to_string());
        }
    }

    BaseScore {
        score,
        reasons,
        applicable,
        matched,
    }
}
