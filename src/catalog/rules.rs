use crate::error::{CropGuardError, Result};
use crate::models::labels::normalize_key;
use crate::models::{PestRule, PestRuleRecord};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

const BUILTIN_RULES: &str = include_str!("../../data/pest_rules.yaml");

/// Crop -> pest -> rule. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    crops: HashMap<String, BTreeMap<String, PestRule>>,
}

impl RuleCatalog {
    /// Rules shipped with the binary
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_RULES, "built-in pest rules")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CropGuardError::Config(format!("Failed to read rules {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content, &path.display().to_string())
    }

    /// Parse and validate a catalog document. Any invalid rule fails the whole load.
    pub fn from_yaml_str(content: &str, origin: &str) -> Result<Self> {
        let raw: BTreeMap<String, BTreeMap<String, PestRuleRecord>> = serde_yaml::from_str(content)
            .map_err(|e| CropGuardError::Catalog(format!("{}: {}", origin, e)))?;

        let mut crops = HashMap::with_capacity(raw.len());
        for (crop_key, pests) in raw {
            let crop = normalize_key(&crop_key);
            if crop.is_empty() {
                return Err(CropGuardError::Catalog(format!("{}: empty crop name", origin)));
            }

            let mut rules = BTreeMap::new();
            for (pest_key, record) in pests {
                let pest = pest_key.trim().to_string();
                if pest.is_empty() {
                    return Err(CropGuardError::Catalog(format!(
                        "{}: {} has a pest with an empty name",
                        origin, crop
                    )));
                }
                let rule = record.into_rule(&format!("{} / {}", crop, pest))?;
                if rules.contains_key(&pest) {
                    return Err(CropGuardError::Catalog(format!(
                        "{}: {} / {} is defined more than once",
                        origin, crop, pest
                    )));
                }
                rules.insert(pest, rule);
            }

            if crops.insert(crop.clone(), rules).is_some() {
                return Err(CropGuardError::Catalog(format!(
                    "{}: crop '{}' is defined more than once",
                    origin, crop
                )));
            }
        }

        let catalog = Self { crops };
        tracing::info!(
            "Loaded {} pest rules for {} crops from {}",
            catalog.rule_count(),
            catalog.crop_count(),
            origin
        );
        Ok(catalog)
    }

    /// Rules for a crop, keyed by pest name. `crop` is normalized before lookup.
    pub fn pests_for(&self, crop: &str) -> Option<&BTreeMap<String, PestRule>> {
        self.crops.get(&normalize_key(crop))
    }

    pub fn rule(&self, crop: &str, pest: &str) -> Option<&PestRule> {
        self.pests_for(crop)?.get(pest)
    }

    /// Crop names in alphabetical order
    pub fn crops(&self) -> Vec<&str> {
        let mut crops: Vec<&str> = self.crops.keys().map(String::as_str).collect();
        crops.sort_unstable();
        crops
    }

    pub fn crop_count(&self) -> usize {
        self.crops.len()
    }

    pub fn rule_count(&self) -> usize {
        self.crops.values().map(BTreeMap::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = RuleCatalog::builtin().unwrap();
        assert_eq!(catalog.crop_count(), 20);
        assert_eq!(catalog.rule_count(), 38);
        assert!(catalog.pests_for("paddy").is_some());
        assert!(catalog.pests_for("areca nut").is_some());
        assert!(catalog.rule("cotton", "Pink Bollworm").is_some());
    }

    #[test]
    fn lookup_normalizes_crop_name() {
        let catalog = RuleCatalog::builtin().unwrap();
        assert!(catalog.pests_for("  Paddy ").is_some());
        assert!(catalog.pests_for("ARECA NUT").is_some());
        assert!(catalog.pests_for("quinoa").is_none());
    }

    #[test]
    fn builtin_blast_rule_shape() {
        let catalog = RuleCatalog::builtin().unwrap();
        let rule = catalog.rule("paddy", "Blast Disease").unwrap();
        assert!(rule
            .conditions
            .iter()
            .any(|c| matches!(c, Condition::HumidityAbove(h) if *h == 85.0)));
        assert!(rule.symptoms.contains("Spindle-shaped"));
    }

    #[test]
    fn crop_keys_are_normalized() {
        let yaml = r#"
"  Ragi ":
  "Blast Disease":
    humidity_gt: 80
"#;
        let catalog = RuleCatalog::from_yaml_str(yaml, "test").unwrap();
        assert_eq!(catalog.crops(), vec!["ragi"]);
    }

    #[test]
    fn duplicate_crop_after_normalization_is_rejected() {
        let yaml = r#"
paddy:
  "Blast Disease":
    humidity_gt: 85
Paddy:
  "Brown Planthopper":
    humidity_gt: 70
"#;
        let err = RuleCatalog::from_yaml_str(yaml, "test").unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn duplicate_pest_after_trimming_is_rejected() {
        let yaml = r#"
paddy:
  "Blast Disease":
    humidity_gt: 85
  "Blast Disease ":
    humidity_gt: 70
"#;
        let err = RuleCatalog::from_yaml_str(yaml, "test").unwrap_err();
        assert!(matches!(err, CropGuardError::Catalog(_)));
        assert!(err.to_string().contains("paddy / Blast Disease is defined more than once"));
    }

    #[test]
    fn unknown_condition_key_fails_load() {
        let yaml = r#"
paddy:
  "Blast Disease":
    humidity_gt: 85
    leaf_wetness_gt: 10
"#;
        assert!(matches!(
            RuleCatalog::from_yaml_str(yaml, "test"),
            Err(CropGuardError::Catalog(_))
        ));
    }

    #[test]
    fn one_element_range_fails_load() {
        let yaml = r#"
paddy:
  "Blast Disease":
    temp_range: [18]
"#;
        assert!(RuleCatalog::from_yaml_str(yaml, "test").is_err());
    }

    #[test]
    fn invalid_rule_names_crop_and_pest() {
        let yaml = r#"
cotton:
  "Pink Bollworm":
    season: ["Octember"]
"#;
        let err = RuleCatalog::from_yaml_str(yaml, "test").unwrap_err();
        assert!(err.to_string().contains("cotton / Pink Bollworm"));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = RuleCatalog::load(Path::new("/nonexistent/rules.yaml"));
        assert!(matches!(result, Err(CropGuardError::Config(_))));
    }
}
