use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::core::ScoringVersion;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    /// HS256 secret used to verify bearer tokens
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Postgres,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Only honoured by the memory backend
    #[serde(default)]
    pub seed_demo_profiles: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default)]
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_secs: None,
            l1_cache_size: None,
        }
    }
}

fn default_cache_enabled() -> bool { true }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    /// How many candidates are fetched from the store per request
    #[serde(default = "default_candidate_pool")]
    pub candidate_pool: usize,
    #[serde(default = "default_nearby_radius_km")]
    pub nearby_radius_km: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            candidate_pool: default_candidate_pool(),
            nearby_radius_km: default_nearby_radius_km(),
        }
    }
}

fn default_limit() -> u16 { 20 }
fn default_max_limit() -> u16 { 100 }
fn default_candidate_pool() -> usize { 200 }
fn default_nearby_radius_km() -> f64 { crate::core::DEFAULT_NEARBY_RADIUS_KM }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub version: ScoringVersion,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MATCH__)
    /// 5. `DATABASE_URL` and `JWT_SECRET`
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_well_known_env(settings)?.try_deserialize()
    }

    /// Reject combinations that deserialize fine but cannot run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message("auth.jwt_secret must not be empty".into()));
        }
        if self.storage.backend == StorageBackend::Postgres && self.database.url.trim().is_empty() {
            return Err(ConfigError::Message(
                "database.url is required when storage.backend = \"postgres\"".into(),
            ));
        }
        if self.matching.default_limit == 0 || self.matching.default_limit > self.matching.max_limit {
            return Err(ConfigError::Message(
                "matching.default_limit must be between 1 and matching.max_limit".into(),
            ));
        }
        let radius = self.matching.nearby_radius_km;
        if radius.is_nan() || radius <= 0.0 {
            return Err(ConfigError::Message("matching.nearby_radius_km must be positive".into()));
        }
        Ok(())
    }
}

/// Apply the conventional unprefixed variables on top of everything else
fn apply_well_known_env(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<Settings, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    const MINIMAL: &str = r#"
        [server]
        host = "127.0.0.1"
        port = 8080

        [auth]
        jwt_secret = "secret"
    "#;

    #[test]
    fn test_minimal_config_defaults() {
        let settings = from_toml(MINIMAL).unwrap();

        assert_eq!(settings.storage.backend, StorageBackend::Memory);
        assert_eq!(settings.scoring.version, ScoringVersion::V1);
        assert_eq!(settings.matching.default_limit, 20);
        assert_eq!(settings.matching.max_limit, 100);
        assert_eq!(settings.matching.nearby_radius_km, 50.0);
        assert!(settings.cache.enabled);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_scoring_version_from_config() {
        let toml = format!("{}\n[scoring]\nversion = \"v2\"\n", MINIMAL);
        let settings = from_toml(&toml).unwrap();
        assert_eq!(settings.scoring.version, ScoringVersion::V2);
    }

    #[test]
    fn test_postgres_requires_url() {
        let toml = format!("{}\n[storage]\nbackend = \"postgres\"\n", MINIMAL);
        let settings = from_toml(&toml).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_non_positive_radius_rejected() {
        for radius in ["0.0", "-5.0", "nan"] {
            let toml = format!("{}\n[matching]\nnearby_radius_km = {}\n", MINIMAL, radius);
            let settings = from_toml(&toml).unwrap();
            assert!(settings.validate().is_err(), "radius {} accepted", radius);
        }
    }

    #[test]
    fn test_shipped_defaults_require_secret() {
        let settings = from_toml(include_str!("../config/default.toml")).unwrap();
        assert!(settings.auth.jwt_secret.is_empty());
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }
}
