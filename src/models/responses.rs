use serde::{Deserialize, Serialize};
use crate::models::domain::{NearbyCandidate, ScoredCandidate};

/// Response for find matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesResponse {
    pub matches: Vec<ScoredCandidate>,
    pub total_candidates: usize,
    pub scoring_version: String,
    /// Set when candidates could not be loaded and the list is empty because of it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Response for nearby endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyResponse {
    pub users: Vec<NearbyCandidate>,
    pub radius_km: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Record relation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRelationResponse {
    pub success: bool,
}
