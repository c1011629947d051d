pub mod assessment;
pub mod geo;
pub mod proximity;
pub mod triage;

// Public re-exports
pub use assessment::assess;
pub use geo::{distance_km, EARTH_RADIUS_KM};
pub use proximity::rank_by_proximity;
pub use triage::{classify, score_symptoms};
