//! Utility values: random names and planar distance

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Names used when the caller does not supply any
pub const DEFAULT_NAMES: &[&str] = &[
    "Steve",
    "Alex",
    "Herobrine",
    "Notch",
    "Creeper",
    "Enderman",
    "Zombie",
    "Skeleton",
    "Spider",
    "Villager",
    "Witch",
    "Ghast",
];

// ============================================================================
// ERROR TYPE
// ============================================================================

#[derive(Error, Debug, PartialEq)]
pub enum UtilityError {
    #[error("Coordinates must be finite numbers")]
    NonFiniteCoordinate,
}

// ============================================================================
// RANDOM NAME
// ============================================================================

/// Pick a name from `names`, or from [`DEFAULT_NAMES`] when the list is
/// absent or holds no non-blank entry.
pub fn random_name(names: Option<&[String]>) -> String {
    random_name_with(names, &mut rand::thread_rng())
}

pub fn random_name_with<R: Rng + ?Sized>(names: Option<&[String]>, rng: &mut R) -> String {
    let provided: Vec<&str> = names
        .unwrap_or_default()
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();

    let pool: &[&str] = if provided.is_empty() {
        DEFAULT_NAMES
    } else {
        &provided
    };

    // pool is never empty: DEFAULT_NAMES is a non-empty constant
    pool.choose(rng).copied().unwrap_or(DEFAULT_NAMES[0]).to_string()
}

// ============================================================================
// DISTANCE
// ============================================================================

/// Euclidean distance between two points in the plane
pub fn distance(a: [f64; 2], b: [f64; 2]) -> Result<f64, UtilityError> {
    if a.iter().chain(b.iter()).any(|c| !c.is_finite()) {
        return Err(UtilityError::NonFiniteCoordinate);
    }
    Ok((a[0] - b[0]).hypot(a[1] - b[1]))
}
