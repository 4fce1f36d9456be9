use crate::error::{CropGuardError, Result};
use crate::models::PestAlert;
use std::collections::HashMap;
use std::path::Path;

/// Turns canonical (English) catalog text into another language.
pub trait Translator: Send + Sync {
    fn translate(&self, text: &str, lang: &str) -> Result<String>;
}

/// Phrase-table translator: `lang -> english text -> translated text`.
#[derive(Debug, Clone, Default)]
pub struct GlossaryTranslator {
    glossaries: HashMap<String, HashMap<String, String>>,
}

impl GlossaryTranslator {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CropGuardError::Config(format!(
                "Failed to read translations {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let raw: HashMap<String, HashMap<String, String>> = serde_yaml::from_str(content)?;
        let glossaries = raw
            .into_iter()
            .map(|(lang, phrases)| (lang.trim().to_lowercase(), phrases))
            .collect();
        Ok(Self { glossaries })
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.glossaries.keys().map(String::as_str).collect();
        langs.sort_unstable();
        langs
    }
}

impl Translator for GlossaryTranslator {
    fn translate(&self, text: &str, lang: &str) -> Result<String> {
        let lang = lang.trim().to_lowercase();
        let glossary = self
            .glossaries
            .get(&lang)
            .ok_or_else(|| CropGuardError::NotFound(format!("no glossary for language '{}'", lang)))?;

        glossary
            .get(text.trim())
            .cloned()
            .ok_or_else(|| CropGuardError::NotFound(format!("no '{}' translation for '{}'", lang, text)))
    }
}

/// English needs no translation
pub fn is_canonical_language(lang: &str) -> bool {
    let lang = lang.trim();
    lang.is_empty() || lang.eq_ignore_ascii_case("en")
}

/// Translate the display text of each alert in place.
///
/// Fields are translated independently. A field that cannot be translated
/// keeps its canonical text. Reasons are left untouched.
pub fn localize_alerts(alerts: &mut [PestAlert], lang: &str, translator: &dyn Translator) {
    if is_canonical_language(lang) {
        return;
    }

    for alert in alerts.iter_mut() {
        for field in [
            &mut alert.pest_name,
            &mut alert.symptoms,
            &mut alert.preventive,
            &mut alert.corrective,
        ] {
            if field.is_empty() {
                continue;
            }
            match translator.translate(field, lang) {
                Ok(translated) => *field = translated,
                Err(e) => {
                    tracing::warn!("Keeping untranslated text for {}: {}", alert.crop_name, e);
                }
            }
        }
    }
}
