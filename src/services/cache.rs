use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{CandidateQuery, MatchRelation, Profile};
use crate::services::store::{ProfileStore, StoreError};

/// In-process profile cache
///
/// Profiles are read far more often than they are edited, so lookups by id
/// go through a bounded TTL cache. Writes through `CachedStore` invalidate
/// the entry so owners always see their own edits.
pub struct CacheManager {
    profiles: moka::future::Cache<String, Arc<Profile>>,
}

impl CacheManager {
    /// Create a new cache manager
    pub fn new(max_entries: u64, ttl_secs: u64) -> Self {
        let profiles = moka::future::CacheBuilder::new(max_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { profiles }
    }

    pub async fn get_profile(&self, user_id: &str) -> Option<Arc<Profile>> {
        let hit = self.profiles.get(&CacheKey::profile(user_id)).await;
        if hit.is_some() {
            tracing::trace!("Profile cache hit: {}", user_id);
        }
        hit
    }

    pub async fn put_profile(&self, profile: Profile) {
        self.profiles
            .insert(CacheKey::profile(&profile.user_id), Arc::new(profile))
            .await;
    }

    pub async fn invalidate_profile(&self, user_id: &str) {
        self.profiles.invalidate(&CacheKey::profile(user_id)).await;
    }
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Build a cache key for a user profile
    pub fn profile(user_id: &str) -> String {
        format!("profile:{}", user_id)
    }
}

/// Read-through cache in front of any `ProfileStore`
pub struct CachedStore {
    inner: Arc<dyn ProfileStore>,
    cache: CacheManager,
}

impl CachedStore {
    pub fn new(inner: Arc<dyn ProfileStore>, cache: CacheManager) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl ProfileStore for CachedStore {
    fn backend_tag(&self) -> &'static str {
        self.inner.backend_tag()
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        if let Some(profile) = self.cache.get_profile(user_id).await {
            return Ok(Some(profile.as_ref().clone()));
        }

        let profile = self.inner.get_profile(user_id).await?;
        if let Some(p) = &profile {
            self.cache.put_profile(p.clone()).await;
        }
        Ok(profile)
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        self.inner.save_profile(profile).await?;
        self.cache.invalidate_profile(&profile.user_id).await;
        Ok(())
    }

    // Candidate lists depend on everyone's visibility; never cached
    async fn list_candidates(&self, query: &CandidateQuery) -> Result<Vec<Profile>, StoreError> {
        self.inner.list_candidates(query).await
    }

    async fn interacted_user_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        self.inner.interacted_user_ids(user_id).await
    }

    async fn record_relation(&self, relation: &MatchRelation) -> Result<(), StoreError> {
        self.inner.record_relation(relation).await
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        self.inner.health_check().await
    }
}
