use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::{Validate, ValidationError};

use crate::models::domain::{ContactInfo, GeoPoint, Profile, Visibility};

/// Request to find matches
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FindMatchesRequest {
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
    #[serde(default, alias = "exclude_user_ids", rename = "excludeUserIds")]
    pub exclude_user_ids: Vec<String>,
}

/// Query string for the nearby endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(range(min = 0.1, max = 20000.0))]
    #[serde(default, alias = "radius_km", rename = "radiusKm")]
    pub radius_km: Option<f64>,
}

/// Full replacement of the caller's editable profile fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_coordinate_pair"))]
pub struct UpdateProfileRequest {
    #[validate(length(max = 100))]
    #[serde(default)]
    pub full_name: Option<String>,
    #[validate(range(min = 18, max = 120))]
    #[serde(default)]
    pub age: Option<u8>,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub gender: Option<String>,
    #[validate(length(max = 2000))]
    #[serde(default)]
    pub bio: Option<String>,
    #[validate(range(min = -90.0, max = 90.0))]
    #[serde(default)]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    #[serde(default)]
    pub longitude: Option<f64>,
    #[validate(length(max = 100))]
    #[serde(default)]
    pub city: Option<String>,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub interests: Vec<String>,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub phone: Option<String>,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub messenger: Option<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

fn validate_coordinate_pair(req: &UpdateProfileRequest) -> Result<(), ValidationError> {
    match (req.latitude, req.longitude) {
        (Some(_), Some(_)) | (None, None) => Ok(()),
        _ => {
            let mut err = ValidationError::new("coordinates");
            err.message = Some("latitude and longitude must be set together".into());
            Err(err)
        }
    }
}

/// Trim a form value, mapping blank input to `None`
fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl UpdateProfileRequest {
    /// Write the requested fields over `profile`.
    ///
    /// Must only be called after `validate()` succeeded.
    pub fn apply_to(&self, profile: &mut Profile) {
        profile.full_name = non_blank(&self.full_name);
        profile.age = self.age;
        profile.gender = non_blank(&self.gender);
        profile.bio = non_blank(&self.bio);
        profile.city = non_blank(&self.city);
        profile.location = GeoPoint::from_columns(self.latitude, self.longitude);
        profile.interests = self
            .interests
            .iter()
            .map(|i| i.trim())
            .filter(|i| !i.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>();
        profile.contact = ContactInfo {
            phone: non_blank(&self.phone),
            messenger: non_blank(&self.messenger),
        };
        profile.visibility = self.visibility;
        profile.updated_at = Some(chrono::Utc::now());
    }
}

/// Request to open or change a relation with another user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordRelationRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    "pending".to_string()
}
