// Service exports
pub mod cache;
pub mod postgres;
pub mod store;

pub use cache::{CacheKey, CacheManager, CachedStore};
pub use postgres::PostgresStore;
pub use store::{demo_profiles, get_or_create_profile, InMemoryStore, ProfileStore, StoreError};
