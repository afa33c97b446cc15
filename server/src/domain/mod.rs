//! Domain logic outside the dataset lookups
//!
//! - `utility` - random name selection and planar distance

pub mod utility;

pub use utility::{UtilityError, distance, random_name};
