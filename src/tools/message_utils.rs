use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use tracing::warn;

use crate::error::{McpError, McpResult};
use crate::mattermost::UsersApi;
use crate::mattermost::types::{PostList, UserInfo};

/// All rendered times use a fixed UTC+9 offset regardless of server locale
const DISPLAY_OFFSET_SECONDS: i32 = 9 * 60 * 60;

/// Which optional fields a formatted post carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFormat {
    /// Search results: channel and last-update time included
    Full,
    /// Channel pages and threads: creation time only
    Compact,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedPost {
    pub id: String,
    pub message: String,
    pub user_id: String,
    pub username: String,
    pub user_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_id: Option<String>,
    pub create_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_at: Option<String>,
}

/// Convert epoch milliseconds to ISO 8601 at UTC+09:00,
/// e.g. `0` becomes `1970-01-01T09:00:00.000+09:00`.
///
/// Years past 9999 render with chrono's sign-prefixed year (`+10000-...`),
/// not the six-digit extended form.
pub fn format_timestamp(millis: i64) -> McpResult<String> {
    let offset = FixedOffset::east_opt(DISPLAY_OFFSET_SECONDS)
        .ok_or(McpError::InvalidTimestamp(millis))?;

    DateTime::from_timestamp_millis(millis)
        .map(|dt| {
            dt.with_timezone(&offset)
                .format("%Y-%m-%dT%H:%M:%S%.3f%:z")
                .to_string()
        })
        .ok_or(McpError::InvalidTimestamp(millis))
}

/// Distinct author IDs of the posts listed in `order`
pub fn collect_author_ids(list: &PostList) -> HashSet<String> {
    list.order
        .iter()
        .filter_map(|id| list.posts.get(id))
        .map(|post| post.user_id.clone())
        .collect()
}

/// Walk `order` and attach author names from `users`.
///
/// Output order is exactly `order`. Authors missing from `users` get the
/// `unknown` / `Unknown User` pair. IDs in `order` without a post body are
/// skipped.
pub fn enrich_posts(
    list: &PostList,
    users: &HashMap<String, UserInfo>,
    format: PostFormat,
) -> McpResult<Vec<FormattedPost>> {
    let unknown = UserInfo::unknown();
    let mut formatted = Vec::with_capacity(list.order.len());

    for post_id in &list.order {
        let Some(post) = list.posts.get(post_id) else {
            warn!(post_id, "Post listed in order but missing from posts");
            continue;
        };

        let user = users.get(&post.user_id).unwrap_or(&unknown);
        let (channel_id, update_at) = match format {
            PostFormat::Full => (
                Some(post.channel_id.clone()),
                Some(format_timestamp(post.update_at)?),
            ),
            PostFormat::Compact => (None, None),
        };

        formatted.push(FormattedPost {
            id: post.id.clone(),
            message: post.message.clone(),
            user_id: post.user_id.clone(),
            username: user.username.clone(),
            user_name: user.name.clone(),
            channel_id,
            create_at: format_timestamp(post.create_at)?,
            update_at,
        });
    }

    Ok(formatted)
}

/// Resolve every distinct author once, then format in display order
pub async fn format_posts(
    list: PostList,
    users_api: &UsersApi,
    format: PostFormat,
) -> McpResult<Vec<FormattedPost>> {
    let author_ids = collect_author_ids(&list);
    let users = users_api.get_users_info(&author_ids).await;
    enrich_posts(&list, &users, format)
}
