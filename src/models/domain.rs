use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Rejected coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoPointError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// A validated point on the globe, in degrees.
///
/// A profile either has a `GeoPoint` or it does not; `(0.0, 0.0)` is a real
/// location in the Gulf of Guinea, not a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = GeoPointError;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoPointError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoPointError::Latitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoPointError::Longitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// Build a point from two nullable storage columns.
    ///
    /// Returns `None` unless both columns hold a valid coordinate.
    pub fn from_columns(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Self::new(lat, lon).ok(),
            _ => None,
        }
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Per-profile privacy switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visibility {
    #[serde(default = "default_true")]
    pub profile: bool,
    #[serde(default = "default_true")]
    pub location: bool,
    #[serde(default)]
    pub contact: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Self {
            profile: true,
            location: true,
            contact: false,
        }
    }
}

fn default_true() -> bool { true }

/// Contact details, only ever shown when the owner opts in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub messenger: Option<String>,
}

impl ContactInfo {
    pub fn is_empty(&self) -> bool {
        self.phone.is_none() && self.messenger.is_none()
    }
}

/// A user's matchable attributes plus privacy flags.
///
/// Keyed by the owning account's `user_id`; only that account writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Profile {
    /// An empty profile, as created for a freshly registered account
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            full_name: None,
            age: None,
            gender: None,
            bio: None,
            location: None,
            city: None,
            interests: BTreeSet::new(),
            contact: ContactInfo::default(),
            visibility: Visibility::default(),
            updated_at: None,
        }
    }

    /// Location as other users may see it
    #[inline]
    pub fn exposed_location(&self) -> Option<GeoPoint> {
        if self.visibility.profile && self.visibility.location {
            self.location
        } else {
            None
        }
    }

    /// Privacy-filtered view handed to anyone but the owner
    pub fn public_view(&self) -> PublicProfile {
        let contact = if self.visibility.profile && self.visibility.contact && !self.contact.is_empty() {
            Some(self.contact.clone())
        } else {
            None
        };

        PublicProfile {
            user_id: self.user_id.clone(),
            full_name: self.full_name.clone(),
            age: self.age,
            gender: self.gender.clone(),
            bio: self.bio.clone(),
            city: self.city.clone(),
            interests: self.interests.iter().cloned().collect(),
            location: self.exposed_location(),
            contact,
        }
    }
}

/// What another user is allowed to see of a profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub user_id: String,
    pub full_name: Option<String>,
    pub age: Option<u8>,
    pub gender: Option<String>,
    pub bio: Option<String>,
    pub city: Option<String>,
    pub interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<ContactInfo>,
}

/// State of a relation one user opened towards another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "relation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RelationStatus {
    Pending,
    Accepted,
    Rejected,
    Blocked,
}

impl std::str::FromStr for RelationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "blocked" => Ok(Self::Blocked),
            other => Err(format!(
                "unknown relation status '{}', expected one of: pending, accepted, rejected, blocked",
                other
            )),
        }
    }
}

/// A directed relation between two users (match request, block, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRelation {
    pub user_id: String,
    pub target_user_id: String,
    pub status: RelationStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl MatchRelation {
    pub fn new(user_id: impl Into<String>, target_user_id: impl Into<String>, status: RelationStatus) -> Self {
        let now = chrono::Utc::now();
        Self {
            user_id: user_id.into(),
            target_user_id: target_user_id.into(),
            status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Scored match result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    pub profile: PublicProfile,
    pub score: u8,
    pub distance_km: Option<f64>,
    pub shared_interests: Vec<String>,
}

/// Nearby search result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyCandidate {
    pub profile: PublicProfile,
    pub distance_km: f64,
}

/// Geospatial bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Candidate query parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateQuery {
    pub requester_id: String,
    pub exclude_user_ids: Vec<String>,
    /// Only return profiles whose location is visible to others
    pub require_location_visible: bool,
    pub bounding_box: Option<BoundingBox>,
    /// `None` returns every match
    pub limit: Option<usize>,
}

impl CandidateQuery {
    pub fn new(requester_id: impl Into<String>, limit: usize) -> Self {
        Self {
            requester_id: requester_id.into(),
            exclude_user_ids: Vec::new(),
            require_location_visible: false,
            bounding_box: None,
            limit: Some(limit),
        }
    }

    /// Every discoverable profile with a visible location inside `bounding_box`
    ///
    /// Uncapped: the caller ranks by distance, so truncating here could drop
    /// the closest users.
    pub fn within(requester_id: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            requester_id: requester_id.into(),
            exclude_user_ids: Vec::new(),
            require_location_visible: true,
            bounding_box: Some(bounding_box),
            limit: None,
        }
    }
}
