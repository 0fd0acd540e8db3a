use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{PostsApi, TeamsApi, UsersApi};
use crate::cache::UserCache;
use crate::config::Config;
use crate::error::{McpError, McpResult};

const API_PREFIX: &str = "/api/v4";

/// Authenticated transport shared by the endpoint groups
#[derive(Debug)]
pub(super) struct ApiCore {
    client: Client,
    base_url: String,
}

impl ApiCore {
    /// Issue one request against `{base_url}/api/v4{endpoint}`.
    ///
    /// Any non-2xx status fails with [`McpError::Api`]. There is no retry:
    /// a single failed attempt is final for the call.
    pub(super) async fn request<T, B>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> McpResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, endpoint);
        debug!(%method, endpoint, "Mattermost request");

        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(McpError::Api {
                status: status.as_u16(),
                status_text: status
                    .canonical_reason()
                    .unwrap_or("Unknown Status")
                    .to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(super) async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> McpResult<T> {
        self.request::<T, ()>(Method::GET, endpoint, None).await
    }

    pub(super) async fn post<T, B>(&self, endpoint: &str, body: &B) -> McpResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, endpoint, Some(body)).await
    }
}

pub struct MattermostClient {
    pub users: UsersApi,
    pub posts: PostsApi,
    pub teams: TeamsApi,
}

impl MattermostClient {
    pub fn new(config: &Config, cache: Arc<UserCache>) -> McpResult<Self> {
        let mut headers = header::HeaderMap::new();
        let auth = header::HeaderValue::from_str(&format!("Bearer {}", config.mattermost.token))
            .map_err(|_| McpError::Config("Access token is not a valid header value".to_string()))?;
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let mut builder = Client::builder()
            .default_headers(headers)
            .pool_max_idle_per_host(config.connection.max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(
                config.connection.pool_idle_timeout_seconds,
            ));
        if let Some(timeout) = config.connection.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        let core = Arc::new(ApiCore {
            client: builder.build()?,
            base_url: config.mattermost.url.trim_end_matches('/').to_string(),
        });

        Ok(Self {
            users: UsersApi::new(core.clone(), cache),
            posts: PostsApi::new(core.clone()),
            teams: TeamsApi::new(core),
        })
    }
}
