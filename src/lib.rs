//! Match Scorer - profile matchmaking service
//!
//! Ranks candidate profiles for a requester with a deterministic, versioned
//! heuristic (age proximity, Haversine distance, shared interests), and serves
//! privacy-filtered profiles over a small JSON API.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{haversine_distance, Matcher, ScoringRules, ScoringVersion};
pub use models::{GeoPoint, Profile, PublicProfile, ScoredCandidate};
pub use services::{InMemoryStore, ProfileStore};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let matcher = Matcher::default();
        assert_eq!(matcher.version(), ScoringVersion::V1);
        assert!(haversine_distance(0.0, 0.0, 0.0, 0.0) < 1e-9);
    }
}
