use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::debug;

use super::message_utils::{PostFormat, format_posts};
use super::{IntoToolResponse, Tool, ToolResponse};
use crate::error::McpResult;
use crate::mattermost::MattermostClient;
use crate::utils::parse_params;

pub struct SearchMessagesTool {
    client: Arc<MattermostClient>,
}

pub struct SearchUserMessagesTool {
    client: Arc<MattermostClient>,
}

impl SearchMessagesTool {
    pub fn new(client: Arc<MattermostClient>) -> Self {
        Self { client }
    }
}

impl SearchUserMessagesTool {
    pub fn new(client: Arc<MattermostClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct SearchMessagesParams {
    query: String,
    #[serde(default)]
    is_or_search: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SearchUserMessagesParams {
    user_name: String,
    #[serde(default)]
    keyword: Option<String>,
}

/// `from:<username>` optionally followed by a keyword
fn build_user_query(username: &str, keyword: Option<&str>) -> String {
    match keyword {
        Some(keyword) if !keyword.is_empty() => format!("from:{} {}", username, keyword),
        _ => format!("from:{}", username),
    }
}

#[async_trait]
impl Tool for SearchMessagesTool {
    fn description(&self) -> &str {
        "Search messages by keyword, author (from:username or @username) or date. \
         Results include each author's username and display name (user_name)."
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: SearchMessagesParams = parse_params(params)?;

        let result = self
            .client
            .posts
            .search_posts(&params.query, params.is_or_search.unwrap_or(false))
            .await?;
        let posts = format_posts(result, &self.client.users, PostFormat::Full).await?;

        ToolResponse::counted(json!({ "posts": posts }), posts.len()).into_response()
    }
}

#[async_trait]
impl Tool for SearchUserMessagesTool {
    fn description(&self) -> &str {
        "Search a specific user's messages by their name or username, \
         optionally narrowed by a keyword"
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: SearchUserMessagesParams = parse_params(params)?;

        // Exact username first, fuzzy user search as a fallback
        let users = match self
            .client
            .users
            .get_user_by_username(&params.user_name)
            .await
        {
            Ok(user) => vec![user],
            Err(e) => {
                debug!(user_name = %params.user_name, error = %e, "Exact username lookup failed");
                self.client.users.search_users(&params.user_name).await?
            }
        };

        // Ambiguous matches resolve to the first user returned
        let Some(user) = users.into_iter().next() else {
            return ToolResponse::counted(
                json!({
                    "error": format!("User '{}' not found", params.user_name),
                    "posts": [],
                }),
                0,
            )
            .into_response();
        };

        let query = build_user_query(&user.username, params.keyword.as_deref());
        let result = self.client.posts.search_posts(&query, false).await?;
        let posts = format_posts(result, &self.client.users, PostFormat::Full).await?;

        ToolResponse::counted(
            json!({
                "found_user": {
                    "id": user.id,
                    "username": user.username,
                    "name": user.display_name(),
                },
                "posts": posts,
            }),
            posts.len(),
        )
        .into_response()
    }
}
