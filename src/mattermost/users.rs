use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use super::client::ApiCore;
use super::types::{MattermostUser, SearchUsersRequest, UserInfo};
use crate::cache::UserCache;
use crate::error::McpResult;

pub struct UsersApi {
    core: Arc<ApiCore>,
    cache: Arc<UserCache>,
}

impl UsersApi {
    pub(super) fn new(core: Arc<ApiCore>, cache: Arc<UserCache>) -> Self {
        Self { core, cache }
    }

    pub async fn get_me(&self) -> McpResult<MattermostUser> {
        self.core.get("/users/me").await
    }

    /// Search active users by name, username or nickname
    pub async fn search_users(&self, term: &str) -> McpResult<Vec<MattermostUser>> {
        let body = SearchUsersRequest {
            term,
            allow_inactive: false,
        };
        self.core.post("/users/search", &body).await
    }

    pub async fn get_user_by_username(&self, username: &str) -> McpResult<MattermostUser> {
        self.core
            .get(&format!("/users/username/{}", username))
            .await
    }

    /// Cache-backed lookup by ID. Any upstream failure is reported as
    /// `None` rather than an error.
    pub async fn get_user(&self, user_id: &str) -> Option<MattermostUser> {
        if let Some(user) = self.cache.get(user_id).await {
            return Some(user);
        }

        match self
            .core
            .get::<MattermostUser>(&format!("/users/{}", user_id))
            .await
        {
            Ok(user) => {
                self.cache.insert(user_id, user.clone()).await;
                Some(user)
            }
            Err(e) => {
                debug!(user_id, error = %e, "User lookup failed");
                None
            }
        }
    }

    /// Resolve each ID to a username and display name, one lookup at a time.
    /// IDs that cannot be resolved map to [`UserInfo::unknown`].
    pub async fn get_users_info(&self, user_ids: &HashSet<String>) -> HashMap<String, UserInfo> {
        let mut user_map = HashMap::with_capacity(user_ids.len());

        for user_id in user_ids {
            let info = match self.get_user(user_id).await {
                Some(user) => UserInfo::from(&user),
                None => UserInfo::unknown(),
            };
            user_map.insert(user_id.clone(), info);
        }

        user_map
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{client_for, user_json};
    use crate::error::McpError;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::collections::HashSet;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_me() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/users/me"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(user_json("me", "cwpark", "Chanwoo", "Park", "")),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let me = client.users.get_me().await.unwrap();

        assert_eq!(me.username, "cwpark");
        assert_eq!(me.email.as_deref(), Some("cwpark@example.com"));
    }

    #[tokio::test]
    async fn test_search_users_excludes_inactive() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v4/users/search"))
            .and(body_json(json!({"term": "park", "allow_inactive": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                user_json("u1", "cwpark", "Chanwoo", "Park", ""),
                user_json("u2", "jhpark", "Jihoon", "Park", ""),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let users = client.users.search_users("park").await.unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(users[1].username, "jhpark");
    }

    #[tokio::test]
    async fn test_get_user_by_username_propagates_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/users/username/ghost"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.users.get_user_by_username("ghost").await.unwrap_err();

        assert!(matches!(err, McpError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_get_user_caches_first_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/users/u1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(user_json("u1", "alice", "Alice", "", "")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client.users.get_user("u1").await.unwrap();
        let second = client.users.get_user("u1").await.unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_get_user_returns_stale_snapshot_after_upstream_change() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/users/u1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(user_json("u1", "alice", "Alice", "", "")),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/users/u1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(user_json("u1", "alice2", "Alicia", "", "")),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        client.users.get_user("u1").await.unwrap();
        let again = client.users.get_user("u1").await.unwrap();

        assert_eq!(again.username, "alice");
    }

    #[tokio::test]
    async fn test_get_user_failure_is_none_and_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/users/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server);

        assert!(client.users.get_user("missing").await.is_none());
        assert!(client.users.get_user("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_get_users_info_resolves_and_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/users/u1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(user_json("u1", "cwpark", "Chanwoo", "Park", "")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/users/u2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(user_json("u2", "bot", "", "", "Helper")),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/users/u3"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let ids: HashSet<String> = ["u1", "u2", "u3"].iter().map(|s| s.to_string()).collect();
        let infos = client.users.get_users_info(&ids).await;

        assert_eq!(infos.len(), 3);
        assert_eq!(infos["u1"].username, "cwpark");
        assert_eq!(infos["u1"].name, "Chanwoo Park");
        assert_eq!(infos["u2"].name, "Helper");
        assert_eq!(infos["u3"].username, "unknown");
        assert_eq!(infos["u3"].name, "Unknown User");
    }
}
