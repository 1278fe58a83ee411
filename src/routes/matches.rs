use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::calculate_bounding_box;
use crate::models::{
    CandidateQuery, FindMatchesRequest, FindMatchesResponse, HealthResponse, MatchRelation, NearbyQuery,
    NearbyResponse, Profile, RecordRelationRequest, RecordRelationResponse, RelationStatus,
};
use crate::routes::{ApiError, AppState, AuthenticatedUser};
use crate::services::{get_or_create_profile, StoreError};

/// Shown instead of results when candidates could not be loaded
pub const MATCHING_UNAVAILABLE_NOTICE: &str = "Matching is temporarily unavailable";

/// Shown instead of nearby users when they could not be loaded
pub const NEARBY_UNAVAILABLE_NOTICE: &str = "Nearby users are temporarily unavailable";

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches/find", web::post().to(find_matches))
        .route("/matches/relation", web::post().to(record_relation))
        .route("/nearby", web::get().to(find_nearby));
}

/// Health check endpoint
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = match state.store.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!("Store health check failed ({}): {}", state.store.backend_tag(), e);
            false
        }
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Request body:
/// ```json
/// {
///   "limit": 20,
///   "excludeUserIds": ["string"]
/// }
/// ```
///
/// Storage failures never surface as errors here: the caller gets an empty
/// list plus a notice so every client renders "no matches" the same way.
async fn find_matches(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<FindMatchesRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let limit = req
        .limit
        .unwrap_or(state.matching.default_limit)
        .min(state.matching.max_limit) as usize;

    tracing::info!("Finding matches for user: {}, limit: {}", user.user_id, limit);

    let (requester, candidates) = match load_match_inputs(&state, &user.user_id, &req.exclude_user_ids).await {
        Ok(inputs) => inputs,
        Err(e) => {
            tracing::error!("Failed to load candidates for {}: {}", user.user_id, e);
            return Ok(HttpResponse::Ok().json(FindMatchesResponse {
                matches: Vec::new(),
                total_candidates: 0,
                scoring_version: state.matcher.version().to_string(),
                notice: Some(MATCHING_UNAVAILABLE_NOTICE.to_string()),
            }));
        }
    };

    let matches = state.matcher.score_candidates(&requester, &candidates, limit);

    tracing::info!(
        "Returning {} matches for user {} (from {} candidates)",
        matches.len(),
        user.user_id,
        candidates.len()
    );

    Ok(HttpResponse::Ok().json(FindMatchesResponse {
        matches,
        total_candidates: candidates.len(),
        scoring_version: state.matcher.version().to_string(),
        notice: None,
    }))
}

/// Requester profile plus the candidate pool, minus everyone already interacted with
async fn load_match_inputs(
    state: &AppState,
    user_id: &str,
    client_exclusions: &[String],
) -> Result<(Profile, Vec<Profile>), StoreError> {
    let requester = get_or_create_profile(state.store.as_ref(), user_id).await?;

    let mut exclude_user_ids = state.store.interacted_user_ids(user_id).await?;
    exclude_user_ids.extend(client_exclusions.iter().cloned());

    tracing::debug!("Excluding {} users for {}", exclude_user_ids.len(), user_id);

    let mut query = CandidateQuery::new(user_id, state.matching.candidate_pool);
    query.exclude_user_ids = exclude_user_ids;

    let candidates = state.store.list_candidates(&query).await?;

    Ok((requester, candidates))
}

/// Nearby users endpoint
///
/// GET /api/v1/nearby?radiusKm={km}
///
/// Scans every visible profile in the bounding box; storage failures come
/// back as an empty list plus a notice, like `find_matches`.
async fn find_nearby(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<NearbyQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let radius_km = query.radius_km.unwrap_or(state.matching.nearby_radius_km);
    let requester = match get_or_create_profile(state.store.as_ref(), &user.user_id).await {
        Ok(profile) => profile,
        Err(e) => return Ok(nearby_unavailable(&user.user_id, radius_km, e)),
    };

    let Some(origin) = requester.location else {
        return Err(ApiError::BadRequest(
            "Set your location before searching for people nearby".to_string(),
        ));
    };

    let candidate_query = CandidateQuery::within(&user.user_id, calculate_bounding_box(&origin, radius_km));

    let candidates = match state.store.list_candidates(&candidate_query).await {
        Ok(candidates) => candidates,
        Err(e) => return Ok(nearby_unavailable(&user.user_id, radius_km, e)),
    };
    let users = state.matcher.find_nearby(&requester, &candidates, radius_km);

    tracing::debug!(
        "Found {} users within {}km of {} (from {} in the box)",
        users.len(),
        radius_km,
        user.user_id,
        candidates.len()
    );

    Ok(HttpResponse::Ok().json(NearbyResponse {
        users,
        radius_km,
        notice: None,
    }))
}

fn nearby_unavailable(user_id: &str, radius_km: f64, err: StoreError) -> HttpResponse {
    tracing::error!("Failed to load nearby users for {}: {}", user_id, err);
    HttpResponse::Ok().json(NearbyResponse {
        users: Vec::new(),
        radius_km,
        notice: Some(NEARBY_UNAVAILABLE_NOTICE.to_string()),
    })
}

/// Record relation endpoint
///
/// POST /api/v1/matches/relation
///
/// Request body:
/// ```json
/// {
///   "targetUserId": "string",
///   "status": "pending|accepted|rejected|blocked"
/// }
/// ```
async fn record_relation(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<RecordRelationRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let status: RelationStatus = req.status.parse().map_err(ApiError::BadRequest)?;

    if req.target_user_id == user.user_id {
        return Err(ApiError::BadRequest("Cannot create a relation with yourself".to_string()));
    }

    if state.store.get_profile(&req.target_user_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("User {} not found", req.target_user_id)));
    }

    let relation = MatchRelation::new(&user.user_id, &req.target_user_id, status);
    state.store.record_relation(&relation).await?;

    tracing::debug!("Recorded relation: {} -> {} ({:?})", user.user_id, req.target_user_id, status);

    Ok(HttpResponse::Ok().json(RecordRelationResponse { success: true }))
}
