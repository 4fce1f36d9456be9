pub mod catalog;
pub mod config;
pub mod error;
pub mod logic;
pub mod models;

pub use catalog::{DistrictHistory, RuleCatalog};
pub use error::{CropGuardError, Result};
pub use logic::PestRiskEngine;
pub use models::{PestAlert, PestQuery, RiskLevel};
