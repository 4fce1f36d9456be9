use crate::catalog::{DistrictHistory, RuleCatalog};
use crate::error::{CropGuardError, Result};
use crate::logic::GlossaryTranslator;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Glossary file used to localize alert text
    #[serde(default)]
    pub translations_path: Option<PathBuf>,
}

/// Catalog sources. Built-in data is used for any path left unset.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub rules_path: Option<PathBuf>,
    #[serde(default)]
    pub history_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub district: Option<String>,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            district: None,
        }
    }
}

impl Config {
    /// Load configuration from an explicit path or the standard search locations.
    ///
    /// An explicit path that does not exist is an error. When nothing is found in the
    /// standard locations the defaults (built-in catalogs) are used.
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(CropGuardError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p
            }
            None => match Self::find_config_path() {
                Some(p) => p,
                None => {
                    tracing::info!("No config file found, using built-in defaults");
                    return Ok(Self::default());
                }
            },
        };

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| CropGuardError::Config(format!("Failed to read config: {}", e)))?;

        let config = Self::from_yaml_str(&config_str)?;
        tracing::info!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = Self::substitute_env_vars(content);

        serde_yaml::from_str(&content)
            .map_err(|e| CropGuardError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Search for config.yaml in standard locations.
    fn find_config_path() -> Option<PathBuf> {
        // Try current directory first
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Some(local_config);
        }

        // Try XDG config directory
        dirs::config_dir()
            .map(|dir| dir.join("cropguard").join("config.yaml"))
            .filter(|p| p.exists())
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        // Find all ${VAR_NAME} patterns and substitute
        let re = match regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") {
            Ok(re) => re,
            Err(_) => return result,
        };

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn load_rules(&self) -> Result<RuleCatalog> {
        match &self.catalog.rules_path {
            Some(path) => RuleCatalog::load(path),
            None => RuleCatalog::builtin(),
        }
    }

    pub fn load_history(&self) -> Result<DistrictHistory> {
        match &self.catalog.history_path {
            Some(path) => DistrictHistory::load(path),
            None => DistrictHistory::builtin(),
        }
    }

    pub fn load_translator(&self) -> Result<Option<GlossaryTranslator>> {
        self.translations_path
            .as_ref()
            .map(GlossaryTranslator::load)
            .transpose()
    }
}
