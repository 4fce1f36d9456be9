use super::labels::normalize_key;
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One farm activity log record (sowing, spraying, irrigation, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    pub crop_name: String,
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub activity: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// A crop currently on the farm and its latest known growth stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropPlanting {
    pub crop_name: String,
    pub stage: Option<String>,
}

/// Read a JSON array of activity log records.
pub fn load_activity_logs(path: &Path) -> Result<Vec<ActivityLog>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Derive the farm's crops and their current stage from activity logs.
///
/// For each crop the most recent dated record wins; undated records rank
/// below dated ones, and among equals the later record in the log wins.
/// Records with a blank crop name are skipped. Output is sorted by crop name.
pub fn latest_plantings(logs: &[ActivityLog]) -> Vec<CropPlanting> {
    let mut latest: BTreeMap<String, (Option<NaiveDate>, Option<String>)> = BTreeMap::new();

    for log in logs {
        let crop = normalize_key(&log.crop_name);
        if crop.is_empty() {
            continue;
        }

        let newer = latest
            .get(&crop)
            .map_or(true, |(seen, _)| log.date >= *seen);
        if newer {
            latest.insert(crop, (log.date, log.stage.clone()));
        }
    }

    latest
        .into_iter()
        .map(|(crop_name, (_, stage))| CropPlanting { crop_name, stage })
        .collect()
}
