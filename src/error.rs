use thiserror::Error;

#[derive(Error, Debug)]
pub enum McpError {
    /// Non-2xx response from the Mattermost REST API
    #[error("Mattermost API error: {status} {status_text}")]
    Api { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(i64),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type McpResult<T> = std::result::Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_carries_status_and_text() {
        let err = McpError::Api {
            status: 404,
            status_text: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "Mattermost API error: 404 Not Found");
    }

    #[test]
    fn test_unknown_tool_names_the_tool() {
        let err = McpError::UnknownTool("delete_everything".to_string());
        assert_eq!(err.to_string(), "Unknown tool: delete_everything");
    }
}
