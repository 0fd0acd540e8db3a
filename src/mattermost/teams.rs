use std::sync::Arc;

use serde_json::Value;

use super::client::ApiCore;
use crate::error::McpResult;

/// Teams and channels are returned as raw JSON; tools forward them untouched.
pub struct TeamsApi {
    core: Arc<ApiCore>,
}

impl TeamsApi {
    pub(super) fn new(core: Arc<ApiCore>) -> Self {
        Self { core }
    }

    /// Teams the token owner belongs to
    pub async fn get_teams(&self) -> McpResult<Value> {
        self.core.get("/users/me/teams").await
    }

    /// Channels of a team that the token owner is a member of
    pub async fn get_channels_for_team(&self, team_id: &str) -> McpResult<Value> {
        self.core
            .get(&format!("/users/me/teams/{}/channels", team_id))
            .await
    }

    pub async fn get_channel(&self, channel_id: &str) -> McpResult<Value> {
        self.core.get(&format!("/channels/{}", channel_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::client_for;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_channels_for_team_passes_through() {
        let server = MockServer::start().await;
        let channels = json!([
            {"id": "ch1", "name": "town-square", "display_name": "Town Square", "type": "O"},
            {"id": "ch2", "name": "dev", "display_name": "Dev", "type": "P"},
        ]);
        Mock::given(method("GET"))
            .and(path("/api/v4/users/me/teams/t1/channels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(channels.clone()))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result = client.teams.get_channels_for_team("t1").await.unwrap();

        assert_eq!(result, channels);
    }

    #[tokio::test]
    async fn test_get_channel() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/channels/ch1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": "ch1", "name": "town-square"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let channel = client.teams.get_channel("ch1").await.unwrap();

        assert_eq!(channel["name"], "town-square");
    }
}
