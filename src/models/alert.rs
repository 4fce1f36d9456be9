use crate::logic::scoring::risk_tier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            RiskLevel::Low => "→",
            RiskLevel::Medium => "⚠",
            RiskLevel::High => "!",
        }
    }

    /// Bucket a 0-1 score using the fixed tier cutoffs
    pub fn from_score(score: f64) -> Self {
        risk_tier(score)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Scored pest or disease risk for one crop. Built fresh per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PestAlert {
    pub crop_name: String,
    pub pest_name: String,
    pub risk_level: RiskLevel,
    pub score: f64,
    pub reasons: Vec<String>,
    pub symptoms: String,
    pub preventive: String,
    pub corrective: String,
}
