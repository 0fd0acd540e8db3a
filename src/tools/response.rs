use crate::error::{McpError, McpResult};
use serde_json::Value;

/// Simplified unified response structure for all tools
#[derive(Debug)]
pub struct ToolResponse {
    /// The actual data returned by the tool
    pub data: Value,

    /// Optional metadata (only when truly necessary)
    pub metadata: Option<ResponseMetadata>,
}

#[derive(Debug)]
pub struct ResponseMetadata {
    /// Number of items returned
    pub total_count: Option<usize>,
}

impl ToolResponse {
    /// Create a simple response with just data
    pub fn data(data: Value) -> Self {
        Self {
            data,
            metadata: None,
        }
    }

    /// Create a response carrying a `total_count` field
    pub fn counted(data: Value, total_count: usize) -> Self {
        Self {
            data,
            metadata: Some(ResponseMetadata {
                total_count: Some(total_count),
            }),
        }
    }

    /// Convert to JSON Value for MCP protocol
    pub fn into_json(self) -> Value {
        let mut result = self.data;
        if let Some(metadata) = self.metadata
            && let Some(count) = metadata.total_count
            && result.is_object()
        {
            result["total_count"] = count.into();
        }
        result
    }
}

/// Helper trait for converting tool results to responses
pub trait IntoToolResponse {
    fn into_response(self) -> McpResult<Value>;
}

impl IntoToolResponse for ToolResponse {
    fn into_response(self) -> McpResult<Value> {
        Ok(self.into_json())
    }
}

/// Result of one tool call as seen by the protocol layer. Every handler
/// outcome, including unknown tools and bad arguments, ends up here.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(Value),
    Failure(String),
}

impl ToolOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutcome::Failure(_))
    }

    /// Render the payload text: pretty JSON on success, `Error: ...` on failure
    pub fn render(self) -> (String, bool) {
        match self {
            ToolOutcome::Success(Value::String(text)) => (text, false),
            ToolOutcome::Success(value) => match serde_json::to_string_pretty(&value) {
                Ok(text) => (text, false),
                Err(e) => (format!("Error: {}", e), true),
            },
            ToolOutcome::Failure(message) => (format!("Error: {}", message), true),
        }
    }
}

impl From<McpResult<Value>> for ToolOutcome {
    fn from(result: McpResult<Value>) -> Self {
        match result {
            Ok(value) => ToolOutcome::Success(value),
            Err(e) => ToolOutcome::from(e),
        }
    }
}

impl From<McpError> for ToolOutcome {
    fn from(err: McpError) -> Self {
        ToolOutcome::Failure(err.to_string())
    }
}
