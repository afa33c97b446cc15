//! Query planning for dataset lookups
//!
//! ## Usage
//!
//! ```
//! use gazetteer_server::data::query::{LookupArgs, operations};
//!
//! let op = operations::find("get_countries").unwrap();
//! let args = LookupArgs::new().arg("capital", Some("Paris".to_string()));
//! let plan = op.plan(&args).unwrap();
//! assert_eq!(plan.sql(), "SELECT * FROM countries WHERE capital LIKE ? LIMIT ?");
//! ```

pub mod builder;
pub mod operations;

pub use builder::{BindValue, FilterSpec, Matcher, OrderBy, OrderDirection, QueryPlan, build};
pub use operations::{LookupArgs, OPERATIONS, Operation, Shape};
