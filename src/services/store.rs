use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::core::filters::matches_query_constraints;
use crate::models::{CandidateQuery, GeoPoint, MatchRelation, Profile};

/// Errors that can occur when reading or writing profiles
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Persistence capability used by the request layer.
///
/// Handlers receive this as an explicit `Arc<dyn ProfileStore>` so the
/// scorer and the routes can be exercised against any backend.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Short name for logs
    fn backend_tag(&self) -> &'static str;

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError>;

    /// Insert or replace the profile keyed by `profile.user_id`
    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Profiles satisfying `query`, in a stable order, at most `query.limit` when set
    async fn list_candidates(&self, query: &CandidateQuery) -> Result<Vec<Profile>, StoreError>;

    /// Every user with a relation to or from `user_id`, whatever its status
    async fn interacted_user_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError>;

    /// Insert or update the relation for the ordered pair
    async fn record_relation(&self, relation: &MatchRelation) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<bool, StoreError>;
}

/// Load a profile, creating an empty one for accounts that have none yet
pub async fn get_or_create_profile(store: &dyn ProfileStore, user_id: &str) -> Result<Profile, StoreError> {
    if let Some(profile) = store.get_profile(user_id).await? {
        return Ok(profile);
    }

    let profile = Profile::new(user_id);
    store.save_profile(&profile).await?;
    tracing::debug!("Created empty profile for user {}", user_id);
    Ok(profile)
}

/// In-process store backed by hash maps
///
/// Used for local runs and tests. Candidate order follows insertion order so
/// results are deterministic.
#[derive(Default)]
pub struct InMemoryStore {
    profiles: RwLock<ProfileTable>,
    relations: RwLock<HashMap<(String, String), MatchRelation>>,
}

#[derive(Default)]
struct ProfileTable {
    by_id: HashMap<String, Profile>,
    order: Vec<String>,
}

impl ProfileTable {
    fn upsert(&mut self, profile: Profile) {
        let user_id = profile.user_id.clone();
        if self.by_id.insert(user_id.clone(), profile).is_none() {
            self.order.push(user_id);
        }
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `profiles`, in iteration order
    pub fn with_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        let mut table = ProfileTable::default();
        for profile in profiles {
            table.upsert(profile);
        }

        Self {
            profiles: RwLock::new(table),
            relations: RwLock::default(),
        }
    }

    /// Store pre-populated with two demo profiles in central Beijing
    pub fn with_demo_profiles() -> Self {
        Self::with_profiles(demo_profiles())
    }

    pub async fn profile_count(&self) -> usize {
        self.profiles.read().await.by_id.len()
    }
}

#[async_trait]
impl ProfileStore for InMemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.read().await.by_id.get(user_id).cloned())
    }

    async fn save_profile(&self, profile: &Profile) -> Result<(), StoreError> {
        if profile.user_id.trim().is_empty() {
            return Err(StoreError::InvalidInput("profile user_id is empty".to_string()));
        }

        self.profiles.write().await.upsert(profile.clone());
        Ok(())
    }

    async fn list_candidates(&self, query: &CandidateQuery) -> Result<Vec<Profile>, StoreError> {
        let table = self.profiles.read().await;
        let candidates = table
            .order
            .iter()
            .filter_map(|id| table.by_id.get(id))
            .filter(|p| matches_query_constraints(p, query))
            .take(query.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(candidates)
    }

    async fn interacted_user_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        let relations = self.relations.read().await;
        let mut ids: Vec<String> = relations
            .keys()
            .filter_map(|(from, to)| {
                if from == user_id {
                    Some(to.clone())
                } else if to == user_id {
                    Some(from.clone())
                } else {
                    None
                }
            })
            .collect();
        ids.sort();
        ids.dedup();
        Ok(ids)
    }

    async fn record_relation(&self, relation: &MatchRelation) -> Result<(), StoreError> {
        if relation.user_id == relation.target_user_id {
            return Err(StoreError::InvalidInput("cannot relate a user to themselves".to_string()));
        }

        let key = (relation.user_id.clone(), relation.target_user_id.clone());
        let mut relations = self.relations.write().await;
        match relations.get_mut(&key) {
            Some(existing) => {
                existing.status = relation.status;
                existing.updated_at = relation.updated_at;
            }
            None => {
                relations.insert(key, relation.clone());
            }
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}

/// Demo accounts seeded into the in-memory backend
pub fn demo_profiles() -> Vec<Profile> {
    let mut demo = Profile::new("demo");
    demo.full_name = Some("Demo User".to_string());
    demo.age = Some(25);
    demo.gender = Some("male".to_string());
    demo.bio = Some("This is a demo account".to_string());
    demo.location = GeoPoint::new(39.9042, 116.4074).ok();
    demo.city = Some("Beijing".to_string());
    demo.interests = ["sports", "music", "travel", "food"].iter().map(|s| s.to_string()).collect();

    let mut test = Profile::new("test");
    test.full_name = Some("Test User".to_string());
    test.age = Some(23);
    test.gender = Some("female".to_string());
    test.bio = Some("Enjoys travel and reading".to_string());
    test.location = GeoPoint::new(39.9163, 116.3972).ok();
    test.city = Some("Beijing".to_string());
    test.interests = ["reading", "photography", "film", "travel"].iter().map(|s| s.to_string()).collect();

    vec![demo, test]
}
