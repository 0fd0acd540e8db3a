use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{IntoToolResponse, Tool, ToolResponse};
use crate::error::McpResult;
use crate::mattermost::MattermostClient;
use crate::utils::parse_params;

pub struct GetTeamsTool {
    client: Arc<MattermostClient>,
}

pub struct GetChannelsTool {
    client: Arc<MattermostClient>,
}

impl GetTeamsTool {
    pub fn new(client: Arc<MattermostClient>) -> Self {
        Self { client }
    }
}

impl GetChannelsTool {
    pub fn new(client: Arc<MattermostClient>) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct GetChannelsParams {
    team_id: String,
}

#[async_trait]
impl Tool for GetTeamsTool {
    fn description(&self) -> &str {
        "List all teams the current user belongs to"
    }

    async fn execute(&self, _params: Value) -> McpResult<Value> {
        let teams = self.client.teams.get_teams().await?;
        ToolResponse::data(teams).into_response()
    }
}

#[async_trait]
impl Tool for GetChannelsTool {
    fn description(&self) -> &str {
        "List channels of a team"
    }

    async fn execute(&self, params: Value) -> McpResult<Value> {
        let params: GetChannelsParams = parse_params(params)?;

        let channels = self
            .client
            .teams
            .get_channels_for_team(&params.team_id)
            .await?;
        ToolResponse::data(channels).into_response()
    }
}
