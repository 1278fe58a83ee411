use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use match_scorer::config::{Settings, StorageBackend};
use match_scorer::core::Matcher;
use match_scorer::routes::{self, AppState, JwtVerifier};
use match_scorer::services::{CacheManager, CachedStore, InMemoryStore, PostgresStore, ProfileStore};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(settings: Option<&Settings>) {
    let log_level = std::env::var("LOG_LEVEL")
        .ok()
        .or_else(|| settings.map(|s| s.logging.level.clone()))
        .unwrap_or_else(|| "info".to_string());
    let log_format = std::env::var("LOG_FORMAT")
        .ok()
        .or_else(|| settings.map(|s| s.logging.format.clone()))
        .unwrap_or_else(|| "json".to_string());

    let filter = EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

async fn build_store(settings: &Settings) -> std::io::Result<Arc<dyn ProfileStore>> {
    let store: Arc<dyn ProfileStore> = match settings.storage.backend {
        StorageBackend::Memory => {
            let store = if settings.storage.seed_demo_profiles {
                InMemoryStore::with_demo_profiles()
            } else {
                InMemoryStore::new()
            };
            info!("Using in-memory store ({} profiles)", store.profile_count().await);
            Arc::new(store)
        }
        StorageBackend::Postgres => {
            let db = &settings.database;
            let store = PostgresStore::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
            })?;
            info!(
                "PostgreSQL store initialized (max: {} connections)",
                db.max_connections.unwrap_or(10)
            );
            Arc::new(store)
        }
    };

    if !settings.cache.enabled {
        return Ok(store);
    }

    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);
    info!("Profile cache enabled (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);

    Ok(Arc::new(CachedStore::new(store, CacheManager::new(l1_cache_size, cache_ttl))))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().and_then(|s| s.validate().map(|_| s));
    init_logging(settings.as_ref().ok());

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Starting match scoring service...");

    let store = build_store(&settings).await?;

    let matcher = Matcher::with_version(settings.scoring.version);
    info!("Matcher initialized with scoring version {}", matcher.version());

    let app_state = AppState {
        store,
        matcher,
        auth: Arc::new(JwtVerifier::new(&settings.auth.jwt_secret)),
        matching: settings.matching.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
