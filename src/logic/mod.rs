pub mod scoring;
pub mod translate;

pub use scoring::PestRiskEngine;
pub use translate::{GlossaryTranslator, Translator};
