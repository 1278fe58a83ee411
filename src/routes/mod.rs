// Route exports
pub mod auth;
pub mod error;
pub mod matches;
pub mod profile;

use actix_web::web;
use std::sync::Arc;

use crate::config::MatchingSettings;
use crate::core::Matcher;
use crate::services::ProfileStore;

pub use auth::{AuthenticatedUser, JwtVerifier};
pub use error::ApiError;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub matcher: Matcher,
    pub auth: Arc<JwtVerifier>,
    pub matching: MatchingSettings,
}

/// Register payload error handlers and every route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(error::handle_query_payload_error))
        .route("/health", web::get().to(matches::health_check))
        .service(
            web::scope("/api/v1")
                .configure(matches::configure)
                .configure(profile::configure),
        );
}
