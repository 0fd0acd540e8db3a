use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::mattermost::MattermostClient;

use super::handlers::RequestHandler;
use super::types::*;

/// Consecutive EOF reads tolerated before the loop exits
const MAX_EMPTY_READS: u32 = 3;

pub struct McpServer {
    handler: Arc<RequestHandler>,
    initialized: Arc<RwLock<bool>>,
}

impl McpServer {
    pub fn new(client: Arc<MattermostClient>) -> Self {
        Self {
            handler: Arc::new(RequestHandler::new(client)),
            initialized: Arc::new(RwLock::new(false)),
        }
    }

    /// Serve newline-delimited JSON-RPC over stdin/stdout
    pub async fn run(&self) -> Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        info!("Mattermost MCP server running on stdio");
        self.serve(reader, writer).await
    }

    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buffer = String::new();
        let mut empty_reads = 0;

        loop {
            buffer.clear();

            match reader.read_line(&mut buffer).await {
                Ok(0) => {
                    empty_reads += 1;

                    // Give it a few chances before exiting
                    if empty_reads > MAX_EMPTY_READS {
                        break;
                    }
                    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
                    continue;
                }
                Ok(_) => {
                    empty_reads = 0;
                    let trimmed = buffer.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    let response = match self.process_request(trimmed).await {
                        Ok(response) => response,
                        Err(e) => {
                            error!("Error processing request: {}", e);
                            Some(JsonRpcResponse::error(
                                None,
                                JsonRpcError::internal_error(e.to_string()),
                            ))
                        }
                    };

                    // Notifications get no response
                    if let Some(response) = response {
                        Self::write_response(&mut writer, &response).await?;
                    }
                }
                Err(e) => {
                    error!("Error reading from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    async fn write_response<W: AsyncWrite + Unpin>(
        writer: &mut W,
        response: &JsonRpcResponse,
    ) -> Result<()> {
        let response_str = serde_json::to_string(response)?;
        writer.write_all(response_str.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }

    async fn process_request(&self, input: &str) -> Result<Option<JsonRpcResponse>> {
        // Parse JSON-RPC request
        let request: JsonRpcRequest = match serde_json::from_str(input) {
            Ok(req) => req,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                return Ok(Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(),
                )));
            }
        };

        // Validate JSON-RPC version
        if request.jsonrpc != "2.0" {
            return Ok(Some(JsonRpcResponse::error(
                request.id.clone(),
                JsonRpcError::invalid_request(),
            )));
        }

        debug!(method = %request.method, "Handling request");

        // Route to appropriate handler
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request).await.map(Some),
            "initialized" | "notifications/initialized" => self.handle_initialized(request).await,
            "tools/list" => self.handle_list_tools(request).await.map(Some),
            "tools/call" => self.handle_call_tool(request).await.map(Some),
            "prompts/list" => Ok(Some(JsonRpcResponse::success(
                request.id,
                serde_json::json!({ "prompts": [] }),
            ))),
            "resources/list" => Ok(Some(JsonRpcResponse::success(
                request.id,
                serde_json::json!({ "resources": [] }),
            ))),
            _ => {
                warn!("Unknown method: {}", request.method);
                if request.is_notification() {
                    return Ok(None);
                }
                Ok(Some(JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::method_not_found(&request.method),
                )))
            }
        }
    }

    async fn handle_initialize(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse> {
        let params: InitializeRequest = match request.params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return Ok(JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params(format!("Invalid params: {}", e)),
                ));
            }
            None => {
                return Ok(JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing params".to_string()),
                ));
            }
        };

        if let Some(client) = &params.client_info {
            info!(client = %client.name, version = %client.version, "Client connected");
        }

        // Support both protocol versions
        let protocol_version = if params.protocol_version.starts_with("2025") {
            PROTOCOL_VERSION_2025.to_string()
        } else {
            PROTOCOL_VERSION.to_string()
        };

        let result = InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities {
                tools: HashMap::new(),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        Ok(JsonRpcResponse::success(
            request.id,
            serde_json::to_value(result)?,
        ))
    }

    async fn handle_initialized(&self, request: JsonRpcRequest) -> Result<Option<JsonRpcResponse>> {
        *self.initialized.write().await = true;

        if request.is_notification() {
            Ok(None)
        } else {
            Ok(Some(JsonRpcResponse::success(request.id, Value::Null)))
        }
    }

    async fn ensure_initialized(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        if *self.initialized.read().await {
            return None;
        }
        Some(JsonRpcResponse::error(
            request.id.clone(),
            JsonRpcError::internal_error("Server not initialized".to_string()),
        ))
    }

    async fn handle_list_tools(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse> {
        if let Some(rejection) = self.ensure_initialized(&request).await {
            return Ok(rejection);
        }

        let result = ListToolsResult {
            tools: self.handler.list_tools(),
        };

        Ok(JsonRpcResponse::success(
            request.id,
            serde_json::to_value(result)?,
        ))
    }

    async fn handle_call_tool(&self, request: JsonRpcRequest) -> Result<JsonRpcResponse> {
        if let Some(rejection) = self.ensure_initialized(&request).await {
            return Ok(rejection);
        }

        let params: CallToolRequest = match request.params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return Ok(JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params(format!("Invalid params: {}", e)),
                ));
            }
            None => {
                return Ok(JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing params".to_string()),
                ));
            }
        };

        // Tool failures are reported inside the result, never as JSON-RPC errors
        let result = self.handler.call_tool(&params.name, params.arguments).await;

        Ok(JsonRpcResponse::success(
            request.id,
            serde_json::to_value(result)?,
        ))
    }
}
