use std::sync::Arc;

use super::client::ApiCore;
use super::types::{MattermostPost, PostList, SearchPostsRequest};
use crate::error::McpResult;

pub struct PostsApi {
    core: Arc<ApiCore>,
}

impl PostsApi {
    pub(super) fn new(core: Arc<ApiCore>) -> Self {
        Self { core }
    }

    /// Search posts across the caller's teams. `terms` is passed through
    /// verbatim, so `from:`, `in:`, `@user` and date modifiers all work.
    /// `is_or_search` combines terms with OR instead of AND.
    pub async fn search_posts(&self, terms: &str, is_or_search: bool) -> McpResult<PostList> {
        let body = SearchPostsRequest {
            terms,
            is_or_search,
        };
        self.core.post("/posts/search", &body).await
    }

    pub async fn get_post(&self, post_id: &str) -> McpResult<MattermostPost> {
        self.core.get(&format!("/posts/{}", post_id)).await
    }

    /// Root post plus all replies
    pub async fn get_post_thread(&self, post_id: &str) -> McpResult<PostList> {
        self.core.get(&format!("/posts/{}/thread", post_id)).await
    }

    pub async fn get_channel_messages(
        &self,
        channel_id: &str,
        page: u32,
        per_page: u32,
    ) -> McpResult<PostList> {
        self.core
            .get(&format!(
                "/channels/{}/posts?page={}&per_page={}",
                channel_id, page, per_page
            ))
            .await
    }
}
