// Core algorithm exports
pub mod distance;
pub mod filters;
pub mod matcher;
pub mod scoring;

pub use distance::{calculate_bounding_box, distance_between, distance_km, haversine_distance, is_within_bounding_box};
pub use filters::{is_discoverable, matches_query_constraints, within_radius};
pub use matcher::{Matcher, DEFAULT_NEARBY_RADIUS_KM};
pub use scoring::{calculate_match_score, ScoreBreakdown, ScoringRules, ScoringVersion};
