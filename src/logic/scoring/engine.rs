use super::booster::{apply_district_history, AdjustedScore};
use super::evaluator::{evaluate_rule, Observation};
use super::tiering::{risk_tier, round_score, MIN_CONFIDENCE};
use crate::catalog::{DistrictHistory, RuleCatalog};
use crate::logic::translate::{localize_alerts, Translator};
use crate::models::labels::{current_month, normalize_key};
use crate::models::{CropPlanting, PestAlert, PestQuery};
use std::sync::Arc;

/// Pest risk scoring over shared, read-only catalogs.
///
/// Holds no mutable state; one engine can serve any number of threads.
#[derive(Clone)]
pub struct PestRiskEngine {
    rules: Arc<RuleCatalog>,
    history: Arc<DistrictHistory>,
    translator: Option<Arc<dyn Translator>>,
}

impl PestRiskEngine {
    pub fn new(rules: Arc<RuleCatalog>, history: Arc<DistrictHistory>) -> Self {
        Self {
            rules,
            history,
            translator: None,
        }
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn rules(&self) -> &RuleCatalog {
        &self.rules
    }

    /// Score every known pest of the query's crop and return the ones worth reporting,
    /// highest score first.
    ///
    /// An unknown crop yields an empty list, as does a crop where nothing clears
    /// the confidence threshold.
    pub fn predict(&self, query: &PestQuery) -> Vec<PestAlert> {
        let crop = normalize_key(&query.crop_name);
        let Some(pests) = self.rules.pests_for(&crop) else {
            tracing::warn!("No pest rules for crop '{}'", crop);
            return Vec::new();
        };

        let month = query.month.unwrap_or_else(current_month);
        let observation = Observation::from_query(query, month);
        let district = query
            .district
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());

        tracing::debug!(
            crop = %crop,
            district = district.unwrap_or("-"),
            taluk = query.taluk.as_deref().unwrap_or("-"),
            month = month.name(),
            "Scoring {} pest rules",
            pests.len()
        );

        let mut alerts: Vec<PestAlert> = pests
            .iter()
            .filter_map(|(pest_name, rule)| {
                let base = evaluate_rule(rule, &observation);
                let adjusted = match district {
                    Some(d) => {
                        apply_district_history(base, &self.history, d, &crop, pest_name, month)
                    }
                    None => AdjustedScore::from(base),
                };

                if adjusted.score < MIN_CONFIDENCE {
                    tracing::debug!(
                        pest = %pest_name,
                        score = adjusted.score,
                        "Below confidence threshold"
                    );
                    return None;
                }

                let score = round_score(adjusted.score);
                Some(PestAlert {
                    crop_name: crop.clone(),
                    pest_name: pest_name.clone(),
                    risk_level: risk_tier(score),
                    score,
                    reasons: adjusted.reasons,
                    symptoms: rule.symptoms.clone(),
                    preventive: rule.preventive.clone(),
                    corrective: rule.corrective.clone(),
                })
            })
            .collect();

        alerts.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.pest_name.cmp(&b.pest_name))
        });

        if let (Some(lang), Some(translator)) = (query.language.as_deref(), &self.translator) {
            localize_alerts(&mut alerts, lang, translator.as_ref());
        }

        alerts
    }

    /// Run [`predict`](Self::predict) for every crop on a farm under the same field conditions.
    ///
    /// `conditions` supplies weather, district, month and language; its crop name and stage
    /// are replaced by each planting's. The month is resolved once for the whole farm.
    pub fn assess_farm(&self, plantings: &[CropPlanting], conditions: &PestQuery) -> Vec<PestAlert> {
        let mut conditions = conditions.clone();
        conditions.month = Some(conditions.month.unwrap_or_else(current_month));

        plantings
            .iter()
            .flat_map(|planting| {
                self.predict(&conditions.for_crop(&planting.crop_name, planting.stage.clone()))
            })
            .collect()
    }
}

impl std::fmt::Debug for PestRiskEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PestRiskEngine")
            .field("crops", &self.rules.crop_count())
            .field("districts", &self.history.district_count())
            .field("translator", &self.translator.is_some())
            .finish()
    }
}
