//! Analytics pipeline for the learning engine
//!
//! Pure aggregation over the attempt ledger: session segmentation, per-
//! concept rollups, the per-user performance snapshot, streak reasoning,
//! weak-area detection, and windowed learning velocity. Everything here is
//! synchronous compute over data the engine has already fetched, which
//! keeps it independently testable and atomic between await points.

pub mod concepts;
pub mod ledger;
pub mod metrics;
pub mod streaks;
pub mod velocity;
pub mod weak_areas;

pub use concepts::aggregate_concepts;
pub use ledger::{build_attempt, fold_into_session};
pub use metrics::{compute_metrics, is_fresh};
pub use streaks::compute_streaks;
pub use velocity::calculate_velocity;
pub use weak_areas::identify_weak_areas;
