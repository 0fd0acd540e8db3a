use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use super::message_utils::{PostFormat, format_posts};
use super::{IntoToolResponse, Tool, ToolResponse};
use crate::error::McpResult;
use crate::mattermost::MattermostClient;
use crate::utils::{deserialize_loose_u32, parse_params};

const DEFAULT_PER_PAGE: u32 = 60;

pub struct GetChannelMessagesTool {
    client: Arc<MattermostClient>,
}

pub struct GetPostThreadTool {
    client: Arc<MattermostClient>,
}

impl GetChannelMessagesTool {
    pub fn new(client: Arc<MattermostClient>) -> Self {
        Self { client }
    }
}

impl GetPostThreadTool {
    pub fn new(client: Arc<MattermostClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct GetChannelMessagesParams {
    channel_id: String,
    #[serde(default, deserialize_with = "deserialize_loose_u32")]
    page: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_loose_u32")]
    per_page: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GetPostThreadParams {
    post_id: String,
}

#[async_trait]
impl Tool for GetChannelMessagesTool {
    fn description(&self) -> &str {
        "Get recent messages of a channel. \
         Results include each author's username and display name (user_name)."
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: GetChannelMessagesParams = parse_params(params)?;
        let page = params.page.unwrap_or(0);
        let per_page = match params.per_page {
            Some(0) | None => DEFAULT_PER_PAGE,
            Some(n) => n,
        };

        let list = self
            .client
            .posts
            .get_channel_messages(&params.channel_id, page, per_page)
            .await?;
        let posts = format_posts(list, &self.client.users, PostFormat::Compact).await?;

        ToolResponse::data(json!({
            "channel_id": params.channel_id,
            "posts": posts,
        }))
        .into_response()
    }
}

#[async_trait]
impl Tool for GetPostThreadTool {
    fn description(&self) -> &str {
        "Get the full thread of a post (root and replies). \
         Results include each author's username and display name (user_name)."
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: GetPostThreadParams = parse_params(params)?;

        let thread = self.client.posts.get_post_thread(&params.post_id).await?;
        let posts = format_posts(thread, &self.client.users, PostFormat::Compact).await?;

        ToolResponse::data(json!({ "posts": posts })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mattermost::testing::{client_for, post_json, user_json};
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_user(server: &MockServer, id: &str, username: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/api/v4/users/{}", id)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(user_json(id, username, "", "", "")),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_get_channel_messages_defaults() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/channels/ch1/posts"))
            .and(query_param("page", "0"))
            .and(query_param("per_page", "60"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "order": ["p2", "p1"],
                "posts": {
                    "p1": post_json("p1", "u1", "older", 0),
                    "p2": post_json("p2", "u1", "newer", 3_600_000),
                },
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_user(&server, "u1", "alice").await;

        let tool = GetChannelMessagesTool::new(client_for(&server));
        let result = tool.execute(json!({"channel_id": "ch1"})).await.unwrap();

        assert_eq!(
            result,
            json!({
                "channel_id": "ch1",
                "posts": [
                    {
                        "id": "p2",
                        "message": "newer",
                        "user_id": "u1",
                        "username": "alice",
                        "user_name": "alice",
                        "create_at": "1970-01-01T10:00:00.000+09:00",
                    },
                    {
                        "id": "p1",
                        "message": "older",
                        "user_id": "u1",
                        "username": "alice",
                        "user_name": "alice",
                        "create_at": "1970-01-01T09:00:00.000+09:00",
                    },
                ],
            })
        );
    }

    #[tokio::test]
    async fn test_get_channel_messages_paging_and_zero_per_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/channels/ch1/posts"))
            .and(query_param("page", "3"))
            .and(query_param("per_page", "60"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"order": [], "posts": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = GetChannelMessagesTool::new(client_for(&server));
        let result = tool
            .execute(json!({"channel_id": "ch1", "page": 3, "per_page": 0}))
            .await
            .unwrap();

        assert_eq!(result["posts"], json!([]));
    }

    #[tokio::test]
    async fn test_get_channel_messages_null_and_float_paging() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/channels/ch1/posts"))
            .and(query_param("page", "0"))
            .and(query_param("per_page", "60"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"order": [], "posts": {}})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v4/channels/ch1/posts"))
            .and(query_param("page", "1"))
            .and(query_param("per_page", "30"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"order": [], "posts": {}})))
            .expect(1)
            .mount(&server)
            .await;

        let tool = GetChannelMessagesTool::new(client_for(&server));
        tool.execute(json!({"channel_id": "ch1", "page": null, "per_page": null}))
            .await
            .unwrap();
        tool.execute(json!({"channel_id": "ch1", "page": 1.0, "per_page": 30.0}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_get_post_thread() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v4/posts/root/thread"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "order": ["root", "r1"],
                "posts": {
                    "r1": post_json("r1", "u2", "answer", 1000),
                    "root": post_json("root", "u1", "question", 0),
                },
            })))
            .mount(&server)
            .await;
        mount_user(&server, "u1", "alice").await;
        Mock::given(method("GET"))
            .and(path("/api/v4/users/u2"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let tool = GetPostThreadTool::new(client_for(&server));
        let result = tool.execute(json!({"post_id": "root"})).await.unwrap();

        let posts = result["posts"].as_array().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0]["id"], "root");
        assert_eq!(posts[0]["username"], "alice");
        assert_eq!(posts[1]["id"], "r1");
        assert_eq!(posts[1]["user_name"], "Unknown User");
        assert!(posts[1].get("update_at").is_none());
        assert!(posts[1].get("channel_id").is_none());
    }
}
