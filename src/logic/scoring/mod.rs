pub mod booster;
pub mod engine;
pub mod evaluator;
pub mod tiering;

pub use booster::{apply_district_history, AdjustedScore};
pub use engine::PestRiskEngine;
pub use evaluator::{evaluate_rule, BaseScore, Observation};
pub use tiering::{risk_tier, round_score, MIN_CONFIDENCE};
