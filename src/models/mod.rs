// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    BoundingBox, CandidateQuery, ContactInfo, GeoPoint, GeoPointError, MatchRelation, NearbyCandidate, Profile,
    PublicProfile, RelationStatus, ScoredCandidate, Visibility,
};
pub use requests::{FindMatchesRequest, NearbyQuery, RecordRelationRequest, UpdateProfileRequest};
pub use responses::{ErrorResponse, FindMatchesResponse, HealthResponse, NearbyResponse, RecordRelationResponse};
