pub mod activity;
pub mod alert;
pub mod district_history;
pub mod labels;
pub mod pest_rule;
pub mod query;

pub use activity::*;
pub use alert::*;
pub use district_history::*;
pub use pest_rule::*;
pub use query::*;
