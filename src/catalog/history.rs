use super::RuleCatalog;
use crate::error::{CropGuardError, Result};
use crate::models::labels::normalize_key;
use crate::models::{DistrictHistoryEntry, HistoryRecord};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

const BUILTIN_HISTORY: &str = include_str!("../../data/district_history.yaml");

type CropHistory = HashMap<String, HashMap<String, DistrictHistoryEntry>>;

/// District -> crop -> pest -> outbreak history. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct DistrictHistory {
    districts: HashMap<String, CropHistory>,
}

/// A history entry that no rule in the catalog can ever match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedEntry {
    pub district: String,
    pub crop: String,
    pub pest: String,
}

impl DistrictHistory {
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_HISTORY, "built-in district history")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CropGuardError::Config(format!("Failed to read history {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content, &path.display().to_string())
    }

    pub fn from_yaml_str(content: &str, origin: &str) -> Result<Self> {
        let raw: BTreeMap<String, BTreeMap<String, BTreeMap<String, HistoryRecord>>> =
            serde_yaml::from_str(content)
                .map_err(|e| CropGuardError::Catalog(format!("{}: {}", origin, e)))?;

        let mut districts = HashMap::with_capacity(raw.len());
        for (district_key, crops) in raw {
            let district = normalize_key(&district_key);
            if district.is_empty() {
                return Err(CropGuardError::Catalog(format!("{}: empty district name", origin)));
            }

            let mut crop_history: CropHistory = HashMap::with_capacity(crops.len());
            for (crop_key, pests) in crops {
                let crop = normalize_key(&crop_key);
                if crop.is_empty() {
                    return Err(CropGuardError::Catalog(format!(
                        "{}: {} has a crop with an empty name",
                        origin, district
                    )));
                }

                let mut entries = HashMap::with_capacity(pests.len());
                for (pest_key, record) in pests {
                    let pest = pest_key.trim().to_string();
                    if pest.is_empty() {
                        return Err(CropGuardError::Catalog(format!(
                            "{}: {} / {} has a pest with an empty name",
                            origin, district, crop
                        )));
                    }
                    let entry = record.into_entry(&format!("{} / {} / {}", district, crop, pest))?;
                    if entries.contains_key(&pest) {
                        return Err(CropGuardError::Catalog(format!(
                            "{}: {} / {} / {} is defined more than once",
                            origin, district, crop, pest
                        )));
                    }
                    entries.insert(pest, entry);
                }

                if crop_history.insert(crop.clone(), entries).is_some() {
                    return Err(CropGuardError::Catalog(format!(
                        "{}: {} lists crop '{}' more than once",
                        origin, district, crop
                    )));
                }
            }

            if districts.insert(district.clone(), crop_history).is_some() {
                return Err(CropGuardError::Catalog(format!(
                    "{}: district '{}' is defined more than once",
                    origin, district
                )));
            }
        }

        let history = Self { districts };
        tracing::info!(
            "Loaded {} outbreak records for {} districts from {}",
            history.entry_count(),
            history.district_count(),
            origin
        );
        Ok(history)
    }

    /// District and crop are normalized; pest names match the rule catalog exactly.
    pub fn lookup(&self, district: &str, crop: &str, pest: &str) -> Option<&DistrictHistoryEntry> {
        self.districts
            .get(&normalize_key(district))?
            .get(&normalize_key(crop))?
            .get(pest)
    }

    pub fn district_count(&self) -> usize {
        self.districts.len()
    }

    pub fn entry_count(&self) -> usize {
        self.districts
            .values()
            .flat_map(HashMap::values)
            .map(HashMap::len)
            .sum()
    }

    /// Entries whose crop + pest pair has no rule in `rules`, sorted.
    pub fn unmatched_entries(&self, rules: &RuleCatalog) -> Vec<UnmatchedEntry> {
        let mut unmatched: Vec<UnmatchedEntry> = self
            .districts
            .iter()
            .flat_map(|(district, crops)| {
                crops.iter().flat_map(move |(crop, pests)| {
                    pests.keys().map(move |pest| (district, crop, pest))
                })
            })
            .filter(|(_, crop, pest)| rules.rule(crop, pest).is_none())
            .map(|(district, crop, pest)| UnmatchedEntry {
                district: district.clone(),
                crop: crop.clone(),
                pest: pest.clone(),
            })
            .collect();

        unmatched.sort_by(|a, b| {
            (&a.district, &a.crop, &a.pest).cmp(&(&b.district, &b.crop, &b.pest))
        });
        unmatched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RiskLevel;
    use chrono::Month;

    #[test]
    fn builtin_history_loads() {
        let history = DistrictHistory::builtin().unwrap();
        assert_eq!(history.district_count(), 31);
        assert!(history.entry_count() > 0);
    }

    #[test]
    fn dharwad_pink_bollworm() {
        let history = DistrictHistory::builtin().unwrap();
        let entry = history
            .lookup("Dharwad", "Cotton", "Pink Bollworm")
            .unwrap();
        assert_eq!(entry.risk_level, RiskLevel::High);
        assert!(entry.is_peak(Month::October));
        assert!(entry.in_season(Month::September));
    }

    #[test]
    fn lookup_misses_return_none() {
        let history = DistrictHistory::builtin().unwrap();
        assert!(history.lookup("atlantis", "cotton", "Pink Bollworm").is_none());
        assert!(history.lookup("dharwad", "quinoa", "Pink Bollworm").is_none());
        assert!(history.lookup("dharwad", "cotton", "Locust").is_none());
    }

    #[test]
    fn prior_entries_are_converted() {
        let yaml = r#"
mysuru:
  tomato:
    "Early Blight":
      prior: 0.8
      season: ["July"]
"#;
        let history = DistrictHistory::from_yaml_str(yaml, "test").unwrap();
        let entry = history.lookup("mysuru", "tomato", "Early Blight").unwrap();
        assert_eq!(entry.risk_level, RiskLevel::High);
    }

    #[test]
    fn invalid_entry_fails_load() {
        let yaml = r#"
mysuru:
  tomato:
    "Early Blight":
      season: ["July"]
"#;
        let err = DistrictHistory::from_yaml_str(yaml, "test").unwrap_err();
        assert!(err.to_string().contains("mysuru / tomato / Early Blight"));
    }

    #[test]
    fn duplicate_pest_after_trimming_is_rejected() {
        let yaml = r#"
dharwad:
  cotton:
    "Pink Bollworm":
      risk_level: HIGH
    " Pink Bollworm":
      risk_level: LOW
"#;
        let err = DistrictHistory::from_yaml_str(yaml, "test").unwrap_err();
        assert!(matches!(err, CropGuardError::Catalog(_)));
        assert!(err
            .to_string()
            .contains("dharwad / cotton / Pink Bollworm is defined more than once"));
    }

    #[test]
    fn empty_keys_are_rejected() {
        let empty_district = r#"
"  ":
  cotton:
    "Pink Bollworm":
      risk_level: HIGH
"#;
        let err = DistrictHistory::from_yaml_str(empty_district, "test").unwrap_err();
        assert!(err.to_string().contains("empty district name"));

        let empty_crop = r#"
dharwad:
  "":
    "Pink Bollworm":
      risk_level: HIGH
"#;
        let err = DistrictHistory::from_yaml_str(empty_crop, "test").unwrap_err();
        assert!(err.to_string().contains("dharwad has a crop with an empty name"));

        let empty_pest = r#"
dharwad:
  cotton:
    " ":
      risk_level: HIGH
"#;
        let err = DistrictHistory::from_yaml_str(empty_pest, "test").unwrap_err();
        assert!(err.to_string().contains("dharwad / cotton has a pest with an empty name"));
    }

    #[test]
    fn unmatched_entries_are_reported() {
        let rules = RuleCatalog::from_yaml_str(
            r#"
cotton:
  "Pink Bollworm":
    humidity_gt: 60
"#,
            "test",
        )
        .unwrap();
        let history = DistrictHistory::from_yaml_str(
            r#"
dharwad:
  cotton:
    "Pink Bollworm":
      risk_level: HIGH
  soybean:
    "Leaf Miner":
      risk_level: MEDIUM
"#,
            "test",
        )
        .unwrap();

        let unmatched = history.unmatched_entries(&rules);
        assert_eq!(
            unmatched,
            vec![UnmatchedEntry {
                district: "dharwad".into(),
                crop: "soybean".into(),
                pest: "Leaf Miner".into(),
            }]
        );
    }
}
