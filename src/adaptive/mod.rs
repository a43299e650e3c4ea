//! Adaptive difficulty and learning-path construction
//!
//! Consumes the analytics rollups to decide, per learner and skill
//! category, what difficulty to present next and in what order to work
//! through the curriculum. Batch recalculation, in-session realtime
//! adjustment, and path assembly all live here as pure functions; the
//! engine owns history lookups and persistence.

pub mod difficulty;
pub mod path;
pub mod recommend;

pub use difficulty::{adjust_realtime, calculate_optimal_difficulty, DEFAULT_DIFFICULTY};
pub use path::build_path;
pub use recommend::build_recommendations;
