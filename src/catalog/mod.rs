pub mod history;
pub mod rules;

pub use history::{DistrictHistory, UnmatchedEntry};
pub use rules::RuleCatalog;
