use chrono::Month;
use clap::{Args, Parser, Subcommand};
use cropguard::models::labels::parse_month;
use cropguard::PestQuery;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cropguard", version, about = "Crop pest and disease risk advisor")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score pest risk for one crop
    Predict {
        /// Crop name, e.g. "paddy" or "areca nut"
        #[arg(long)]
        crop: String,

        /// Current growth stage, e.g. "flowering"
        #[arg(long)]
        stage: Option<String>,

        #[command(flatten)]
        conditions: ConditionArgs,
    },
    /// Score pest risk for every crop found in a farm's activity logs
    Farm {
        /// JSON array of activity log records
        #[arg(long)]
        logs: PathBuf,

        #[command(flatten)]
        conditions: ConditionArgs,
    },
    /// List crops and pests in the rule catalog
    Crops,
    /// Validate config and catalogs
    Check,
}

/// Field conditions shared by every crop in a request
#[derive(Args, Debug, Clone, Default)]
pub struct ConditionArgs {
    /// District name, enables outbreak history
    #[arg(long)]
    pub district: Option<String>,

    #[arg(long)]
    pub taluk: Option<String>,

    /// Soil type, e.g. "black soil"
    #[arg(long)]
    pub soil: Option<String>,

    /// Air temperature in °C
    #[arg(long, allow_negative_numbers = true)]
    pub temp: Option<f64>,

    /// Relative humidity in %
    #[arg(long)]
    pub humidity: Option<f64>,

    /// Rainfall in mm
    #[arg(long)]
    pub rainfall: Option<f64>,

    /// Month as 1-12 or a name; defaults to the current month
    #[arg(long, value_parser = month_arg)]
    pub month: Option<Month>,

    /// Free-text description of what the farmer is seeing
    #[arg(long)]
    pub symptoms: Option<String>,

    /// Output language code, e.g. "kn"
    #[arg(long)]
    pub lang: Option<String>,

    /// Print alerts as JSON
    #[arg(long)]
    pub json: bool,
}

impl ConditionArgs {
    /// Build a query for `crop`, filling district and language from config defaults
    pub fn to_query(
        &self,
        crop: &str,
        stage: Option<String>,
        default_district: Option<&str>,
        default_language: &str,
    ) -> PestQuery {
        PestQuery {
            crop_name: crop.to_string(),
            district: self
                .district
                .clone()
                .or_else(|| default_district.map(str::to_string)),
            taluk: self.taluk.clone(),
            soil_type: self.soil.clone(),
            stage,
            temperature_c: self.temp,
            humidity_percent: self.humidity,
            rainfall_mm: self.rainfall,
            month: self.month,
            symptoms_text: self.symptoms.clone(),
            language: Some(
                self.lang
                    .clone()
                    .unwrap_or_else(|| default_language.to_string()),
            ),
        }
    }
}

fn month_arg(s: &str) -> Result<Month, String> {
    parse_month(s).ok_or_else(|| format!("'{}' is not a month (use 1-12 or a month name)", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_predict_arguments() {
        let cli = Cli::try_parse_from([
            "cropguard",
            "predict",
            "--crop",
            "paddy",
            "--temp",
            "26",
            "--humidity",
            "90",
            "--month",
            "August",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Predict {
                crop, conditions, ..
            } => {
                assert_eq!(crop, "paddy");
                assert_eq!(conditions.temp, Some(26.0));
                assert_eq!(conditions.month, Some(Month::August));
            }
            _ => panic!("expected predict"),
        }
    }

    #[test]
    fn rejects_bad_month() {
        let result = Cli::try_parse_from(["cropguard", "predict", "--crop", "paddy", "--month", "13"]);
        assert!(result.is_err());
    }

    #[test]
    fn query_uses_config_defaults() {
        let args = ConditionArgs {
            humidity: Some(88.0),
            ..Default::default()
        };
        let query = args.to_query("cotton", Some("flowering".into()), Some("dharwad"), "en");
        assert_eq!(query.district.as_deref(), Some("dharwad"));
        assert_eq!(query.language.as_deref(), Some("en"));
        assert_eq!(query.stage.as_deref(), Some("flowering"));

        let args = ConditionArgs {
            district: Some("mandya".into()),
            lang: Some("kn".into()),
            ..Default::default()
        };
        let query = args.to_query("paddy", None, Some("dharwad"), "en");
        assert_eq!(query.district.as_deref(), Some("mandya"));
        assert_eq!(query.language.as_deref(), Some("kn"));
    }
}
