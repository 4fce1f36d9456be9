mod cli;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, ConditionArgs};
use cropguard::config::Config;
use cropguard::models::{latest_plantings, load_activity_logs};
use cropguard::{DistrictHistory, PestAlert, PestRiskEngine, RuleCatalog};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config).context("Failed to load configuration")?;
    let default_district = config.defaults.district.as_deref();
    let default_language = config.defaults.language.as_str();

    match cli.command {
        Commands::Predict {
            crop,
            stage,
            conditions,
        } => {
            let engine = build_engine(&config)?;
            let query = conditions.to_query(&crop, stage, default_district, default_language);
            let alerts = engine.predict(&query);
            print_alerts(&alerts, &conditions)?;
        }
        Commands::Farm { logs, conditions } => {
            let engine = build_engine(&config)?;
            let records = load_activity_logs(&logs)
                .with_context(|| format!("Failed to load activity logs {}", logs.display()))?;

            let plantings = latest_plantings(&records);
            tracing::info!("Found {} crops in activity logs", plantings.len());

            let base = conditions.to_query("", None, default_district, default_language);
            let alerts = engine.assess_farm(&plantings, &base);
            print_alerts(&alerts, &conditions)?;
        }
        Commands::Crops => {
            let engine = build_engine(&config)?;
            let rules = engine.rules();
            for crop in rules.crops() {
                let pests: Vec<&str> = rules
                    .pests_for(crop)
                    .map(|p| p.keys().map(String::as_str).collect())
                    .unwrap_or_default();
                println!("{}: {}", crop, pests.join(", "));
            }
        }
        Commands::Check => check(&config)?,
    }

    Ok(())
}

fn build_engine(config: &Config) -> anyhow::Result<PestRiskEngine> {
    let rules = config.load_rules().context("Failed to load pest rules")?;
    let history = config
        .load_history()
        .context("Failed to load district history")?;

    let mut engine = PestRiskEngine::new(Arc::new(rules), Arc::new(history));
    if let Some(translator) = config
        .load_translator()
        .context("Failed to load translations")?
    {
        engine = engine.with_translator(Arc::new(translator));
    }
    Ok(engine)
}

fn check(config: &Config) -> anyhow::Result<()> {
    let rules: RuleCatalog = config.load_rules().context("Failed to load pest rules")?;
    println!(
        "Pest rules: OK ({} crops, {} rules)",
        rules.crop_count(),
        rules.rule_count()
    );

    let history: DistrictHistory = config
        .load_history()
        .context("Failed to load district history")?;
    println!(
        "District history: OK ({} districts, {} records)",
        history.district_count(),
        history.entry_count()
    );

    match config
        .load_translator()
        .context("Failed to load translations")?
    {
        Some(translator) => println!("Translations: OK ({})", translator.languages().join(", ")),
        None => println!("Translations: not configured"),
    }

    let unmatched = history.unmatched_entries(&rules);
    if unmatched.is_empty() {
        println!("Every history record has a matching rule");
    } else {
        println!(
            "{} history records have no matching rule and will never apply:",
            unmatched.len()
        );
        for entry in &unmatched {
            println!("  {} / {} / {}", entry.district, entry.crop, entry.pest);
        }
    }

    Ok(())
}

fn print_alerts(alerts: &[PestAlert], conditions: &ConditionArgs) -> anyhow::Result<()> {
    if conditions.json {
        println!("{}", serde_json::to_string_pretty(alerts)?);
        return Ok(());
    }

    if alerts.is_empty() {
        println!("No significant pest risk found.");
        return Ok(());
    }

    for alert in alerts {
        println!(
            "{} {} ({}) - {} risk, score {:.2}",
            alert.risk_level.symbol(),
            alert.pest_name,
            alert.crop_name,
            alert.risk_level,
            alert.score
        );
        for reason in &alert.reasons {
            println!("    - {}", reason);
        }
        if !alert.symptoms.is_empty() {
            println!("    Symptoms:   {}", alert.symptoms);
        }
        if !alert.preventive.is_empty() {
            println!("    Preventive: {}", alert.preventive);
        }
        if !alert.corrective.is_empty() {
            println!("    Corrective: {}", alert.corrective);
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn write_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cropguard-{}-{}.yaml", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    fn run_with(config: &Path, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["cropguard", "--config", config.to_str().unwrap()];
        argv.extend_from_slice(args);
        run(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn check_runs_against_builtin_catalogs() {
        let config = write_config("check-ok", "{}");
        let result = run_with(&config, &["check"]);
        std::fs::remove_file(&config).ok();
        assert!(result.is_ok(), "{:?}", result);
    }

    #[test]
    fn check_fails_when_rules_file_is_missing() {
        let config = write_config(
            "check-missing",
            "catalog:\n  rules_path: no/such/pest_rules.yaml\n",
        );
        let result = run_with(&config, &["check"]);
        std::fs::remove_file(&config).ok();
        assert!(result.is_err());
    }

    #[test]
    fn predict_runs_for_unknown_crop() {
        let config = write_config("predict", "{}");
        let result = run_with(&config, &["predict", "--crop", "quinoa", "--month", "8"]);
        std::fs::remove_file(&config).ok();
        assert!(result.is_ok(), "{:?}", result);
    }
}
