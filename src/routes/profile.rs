use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::UpdateProfileRequest;
use crate::routes::{ApiError, AppState, AuthenticatedUser};
use crate::services::get_or_create_profile;

/// Configure profile routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profile", web::get().to(get_own_profile))
        .route("/profile", web::put().to(update_own_profile))
        .route("/profiles/{user_id}", web::get().to(get_profile));
}

/// The caller's full profile, including private fields
async fn get_own_profile(state: web::Data<AppState>, user: AuthenticatedUser) -> Result<HttpResponse, ApiError> {
    let profile = get_or_create_profile(state.store.as_ref(), &user.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Replace the caller's editable fields
///
/// PUT /api/v1/profile
async fn update_own_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let mut profile = get_or_create_profile(state.store.as_ref(), &user.user_id).await?;
    req.apply_to(&mut profile);
    state.store.save_profile(&profile).await?;

    tracing::info!("Updated profile for user {}", user.user_id);

    Ok(HttpResponse::Ok().json(profile))
}

/// Another user's profile, filtered by their privacy settings
///
/// GET /api/v1/profiles/{userId}
async fn get_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let target_id = path.into_inner();

    let profile = state
        .store
        .get_profile(&target_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {} not found", target_id)))?;

    if profile.user_id == user.user_id {
        return Ok(HttpResponse::Ok().json(profile));
    }

    // Hidden profiles are indistinguishable from missing ones
    if !profile.visibility.profile {
        return Err(ApiError::NotFound(format!("User {} not found", target_id)));
    }

    Ok(HttpResponse::Ok().json(profile.public_view()))
}
