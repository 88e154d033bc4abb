//! Centralized balance and tuning constants for Fateline game logic.
//!
//! These values define the deterministic math for the round pipeline.
//! Keeping them together ensures that outcomes can only be adjusted via
//! code changes reviewed in version control, rather than through external
//! JSON assets.

// Round structure ----------------------------------------------------------
pub const ROUND_COUNT: u32 = 10;

// Base survival prior ------------------------------------------------------
// Coarse heuristic, not a model: the historical outcome flag alone decides
// which prior applies. Deliberately independent of class, sex, age or fare.
pub const BASE_PROB_SURVIVED: f64 = 0.7;
pub const BASE_PROB_PERISHED: f64 = 0.3;

// Outcome thresholds -------------------------------------------------------
// Survival uses a strict comparison: exactly 0.5 counts as not-survived.
pub const SURVIVAL_THRESHOLD: f64 = 0.5;
pub const MORAL_HEROIC_MIN: i32 = 5;
pub const MORAL_ORDINARY_MIN: i32 = 0;

// Tags ---------------------------------------------------------------------
// Sentinel used when an event choice declares no tag.
pub const UNKNOWN_TAG: &str = "unknown";
pub const TAG_TALLY_TOP: usize = 3;
// A selfish streak only dominates the summary once it repeats.
pub const SELFISH_SUMMARY_MIN: usize = 2;

// Cabin classes ------------------------------------------------------------
pub const CABIN_CLASS_MIN: u8 = 1;
pub const CABIN_CLASS_MAX: u8 = 3;

pub const FLOAT_EPSILON: f64 = 1e-9;
