use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use super::{IntoToolResponse, Tool, ToolResponse};
use crate::error::McpResult;
use crate::mattermost::MattermostClient;
use crate::mattermost::types::MattermostUser;
use crate::utils::parse_params;

pub struct GetCurrentUserTool {
    client: Arc<MattermostClient>,
}

pub struct GetUserInfoTool {
    client: Arc<MattermostClient>,
}

pub struct SearchUsersTool {
    client: Arc<MattermostClient>,
}

impl GetCurrentUserTool {
    pub fn new(client: Arc<MattermostClient>) -> Self {
        Self { client }
    }
}

impl GetUserInfoTool {
    pub fn new(client: Arc<MattermostClient>) -> Self {
        Self { client }
    }
}

impl SearchUsersTool {
    pub fn new(client: Arc<MattermostClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct GetUserInfoParams {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct SearchUsersParams {
    search_term: String,
}

/// Profile fields shared by get_current_user and get_user_info
fn user_profile(user: &MattermostUser) -> Value {
    json!({
        "id": user.id,
        "username": user.username,
        "email": user.email.clone().unwrap_or_default(),
        "first_name": user.first_name,
        "last_name": user.last_name,
        "nickname": user.nickname,
        "full_name": user.full_name(),
    })
}

#[async_trait]
impl Tool for GetCurrentUserTool {
    fn description(&self) -> &str {
        "Get the profile of the token owner (me)"
    }

    async fn execute(&self, _params: Value) -> McpResult<Value> {
        let me = self.client.users.get_me().await?;
        ToolResponse::data(user_profile(&me)).into_response()
    }
}

#[async_trait]
impl Tool for GetUserInfoTool {
    fn description(&self) -> &str {
        "Get a user's profile by user ID (username, name, nickname)"
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: GetUserInfoParams = parse_params(params)?;

        let data = match self.client.users.get_user(&params.user_id).await {
            Some(user) => user_profile(&user),
            None => json!({
                "error": "User not found",
                "user_id": params.user_id,
            }),
        };

        ToolResponse::data(data).into_response()
    }
}

#[async_trait]
impl Tool for SearchUsersTool {
    fn description(&self) -> &str {
        "Search users by name, username or nickname"
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: SearchUsersParams = parse_params(params)?;

        let users = self.client.users.search_users(&params.search_term).await?;

        let user_results: Vec<Value> = users
            .iter()
            .map(|user| {
                json!({
                    "id": user.id,
                    "username": user.username,
                    "name": user.display_name(),
                    "nickname": user.nickname,
                })
            })
            .collect();

        ToolResponse::counted(json!({ "users": user_results }), user_results.len())
            .into_response()
    }
}
