use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::mattermost::types::MattermostUser;

/// Process-lifetime memo of user lookups, keyed by user ID.
///
/// Entries are filled lazily on the first successful lookup and are never
/// evicted or refreshed: once a user is cached, every later read returns
/// that snapshot even if the account changes upstream. A restart is the
/// only way to observe renamed or updated users.
#[derive(Debug, Default)]
pub struct UserCache {
    users: RwLock<HashMap<String, MattermostUser>>,
}

impl UserCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: &str) -> Option<MattermostUser> {
        let users = self.users.read().await;
        let cached = users.get(user_id).cloned();
        debug!(user_id, hit = cached.is_some(), "User cache lookup");
        cached
    }

    /// Store a user under the given ID. An existing entry is kept as-is.
    pub async fn insert(&self, user_id: &str, user: MattermostUser) {
        let mut users = self.users.write().await;
        users.entry(user_id.to_string()).or_insert(user);
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn create_test_user(id: &str, username: &str, first_name: &str) -> MattermostUser {
        MattermostUser {
            id: id.to_string(),
            username: username.to_string(),
            first_name: first_name.to_string(),
            last_name: String::new(),
            nickname: String::new(),
            email: None,
        }
    }

    #[tokio::test]
    async fn test_empty_cache_misses() {
        let cache = UserCache::new();

        assert!(cache.is_empty().await);
        assert!(cache.get("u1").await.is_none());
    }

    #[tokio::test]
    async fn test_insert_then_get() {
        let cache = UserCache::new();
        cache
            .insert("u1", create_test_user("u1", "alice", "Alice"))
            .await;

        let user = cache.get("u1").await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_cached_entry_is_never_refreshed() {
        // Staleness is accepted: a later insert for the same ID does not
        // replace the first snapshot.
        let cache = UserCache::new();
        cache
            .insert("u1", create_test_user("u1", "alice", "Alice"))
            .await;
        cache
            .insert("u1", create_test_user("u1", "alice.renamed", "Alicia"))
            .await;

        let user = cache.get("u1").await.unwrap();
        assert_eq!(user.username, "alice");
        assert_eq!(user.first_name, "Alice");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_inserts() {
        let cache = Arc::new(UserCache::new());

        let mut handles = Vec::new();
        for i in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                let id = format!("u{}", i);
                cache
                    .insert(&id, create_test_user(&id, &format!("user{}", i), ""))
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(cache.len().await, 8);
    }
}
