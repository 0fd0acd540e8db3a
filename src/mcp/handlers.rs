use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::error::McpError;
use crate::mattermost::MattermostClient;
use crate::tools::{Tool, ToolOutcome, messages, search, teams, users};

use super::types::{CallToolResult, Property, Tool as McpTool, ToolInputSchema};

pub struct RequestHandler {
    tools: HashMap<String, Box<dyn Tool + Send + Sync>>,
    /// Registration order, used for listing
    catalog: Vec<String>,
}

macro_rules! register_tool {
    ($handler:expr, $name:expr, $tool:expr) => {
        $handler.register($name, Box::new($tool));
    };
}

impl RequestHandler {
    pub fn new(client: Arc<MattermostClient>) -> Self {
        let mut handler = Self {
            tools: HashMap::new(),
            catalog: Vec::new(),
        };

        // Register user tools
        register_tool!(
            handler,
            "get_current_user",
            users::GetCurrentUserTool::new(client.clone())
        );
        register_tool!(
            handler,
            "get_user_info",
            users::GetUserInfoTool::new(client.clone())
        );

        // Register search tools
        register_tool!(
            handler,
            "search_messages",
            search::SearchMessagesTool::new(client.clone())
        );
        register_tool!(
            handler,
            "search_user_messages",
            search::SearchUserMessagesTool::new(client.clone())
        );
        register_tool!(
            handler,
            "search_users",
            users::SearchUsersTool::new(client.clone())
        );

        // Register team and channel tools
        register_tool!(handler, "get_teams", teams::GetTeamsTool::new(client.clone()));
        register_tool!(
            handler,
            "get_channels",
            teams::GetChannelsTool::new(client.clone())
        );

        // Register message tools
        register_tool!(
            handler,
            "get_channel_messages",
            messages::GetChannelMessagesTool::new(client.clone())
        );
        register_tool!(
            handler,
            "get_post_thread",
            messages::GetPostThreadTool::new(client)
        );

        handler
    }

    fn register(&mut self, name: &str, tool: Box<dyn Tool + Send + Sync>) {
        if self.tools.insert(name.to_string(), tool).is_none() {
            self.catalog.push(name.to_string());
        }
    }

    pub fn list_tools(&self) -> Vec<McpTool> {
        self.catalog
            .iter()
            .filter_map(|name| {
                self.tools
                    .get(name)
                    .map(|tool| Self::tool_to_mcp_tool(name, tool.as_ref()))
            })
            .collect()
    }

    /// Run a tool and fold every failure into [`ToolOutcome::Failure`]
    pub async fn execute_tool(&self, name: &str, arguments: Option<Value>) -> ToolOutcome {
        // Tools without required arguments accept a missing arguments object
        let arguments = arguments.unwrap_or_else(|| Value::Object(Default::default()));

        let outcome = match self.tools.get(name) {
            Some(tool) => ToolOutcome::from(tool.execute(arguments).await),
            None => ToolOutcome::from(McpError::UnknownTool(name.to_string())),
        };

        if let ToolOutcome::Failure(message) = &outcome {
            warn!(tool = name, error = %message, "Tool call failed");
        }

        outcome
    }

    pub async fn call_tool(&self, name: &str, arguments: Option<Value>) -> CallToolResult {
        let (text, is_error) = self.execute_tool(name, arguments).await.render();
        CallToolResult::text(text, is_error)
    }

    // Helper functions for creating tool schemas
    fn create_string_prop(description: &str) -> Property {
        Property {
            property_type: "string".to_string(),
            description: Some(description.to_string()),
            default: None,
        }
    }

    fn create_number_prop(description: &str, default: u32) -> Property {
        Property {
            property_type: "number".to_string(),
            description: Some(description.to_string()),
            default: Some(Value::Number(default.into())),
        }
    }

    fn create_bool_prop(description: &str, default: bool) -> Property {
        Property {
            property_type: "boolean".to_string(),
            description: Some(description.to_string()),
            default: Some(Value::Bool(default)),
        }
    }

    fn tool_to_mcp_tool(name: &str, tool: &(dyn Tool + Send + Sync)) -> McpTool {
        // Create input schema based on tool name
        let (properties, required) = match name {
            "get_user_info" => {
                let mut props = HashMap::new();
                props.insert(
                    "user_id".to_string(),
                    Self::create_string_prop("ID of the user to look up"),
                );
                (props, vec!["user_id".to_string()])
            }
            "search_messages" => {
                let mut props = HashMap::new();
                props.insert(
                    "query".to_string(),
                    Self::create_string_prop(
                        "Search terms. Use 'from:username' or '@username' to search by author",
                    ),
                );
                props.insert(
                    "is_or_search".to_string(),
                    Self::create_bool_prop(
                        "Combine terms with OR when true, AND when false (default: false)",
                        false,
                    ),
                );
                (props, vec!["query".to_string()])
            }
            "search_user_messages" => {
                let mut props = HashMap::new();
                props.insert(
                    "user_name".to_string(),
                    Self::create_string_prop("Name or username of the author (e.g. 'cwpark')"),
                );
                props.insert(
                    "keyword".to_string(),
                    Self::create_string_prop("Additional keyword to search for (optional)"),
                );
                (props, vec!["user_name".to_string()])
            }
            "search_users" => {
                let mut props = HashMap::new();
                props.insert(
                    "search_term".to_string(),
                    Self::create_string_prop("Name, username or nickname to search for"),
                );
                (props, vec!["search_term".to_string()])
            }
            "get_channels" => {
                let mut props = HashMap::new();
                props.insert("team_id".to_string(), Self::create_string_prop("Team ID"));
                (props, vec!["team_id".to_string()])
            }
            "get_channel_messages" => {
                let mut props = HashMap::new();
                props.insert(
                    "channel_id".to_string(),
                    Self::create_string_prop("Channel ID"),
                );
                props.insert(
                    "page".to_string(),
                    Self::create_number_prop("Page number (default: 0)", 0),
                );
                props.insert(
                    "per_page".to_string(),
                    Self::create_number_prop("Messages per page (default: 60)", 60),
                );
                (props, vec!["channel_id".to_string()])
            }
            "get_post_thread" => {
                let mut props = HashMap::new();
                props.insert(
                    "post_id".to_string(),
                    Self::create_string_prop("ID of any post in the thread"),
                );
                (props, vec!["post_id".to_string()])
            }
            // get_current_user, get_teams
            _ => (HashMap::new(), vec![]),
        };

        McpTool {
            name: name.to_string(),
            description: tool.description().to_string(),
            input_schema: ToolInputSchema {
                schema_type: "object".to_string(),
                properties,
                required,
            },
        }
    }
}
