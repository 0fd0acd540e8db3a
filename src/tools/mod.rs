pub mod message_utils;
pub mod messages;
pub mod response;
pub mod search;
pub mod teams;
pub mod users;

use crate::error::McpResult;
use async_trait::async_trait;
use serde_json::Value;

pub use response::{IntoToolResponse, ToolOutcome, ToolResponse};

#[async_trait]
pub trait Tool {
    fn description(&self) -> &str;
    async fn execute(&self, params: Value) -> McpResult<Value>;
}
