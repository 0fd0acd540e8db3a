use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MattermostUser {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl MattermostUser {
    /// "first last" trimmed, or the nickname when both names are blank.
    /// May be empty.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if !full.is_empty() {
            full.to_string()
        } else {
            self.nickname.clone()
        }
    }

    /// Like [`display_name`](Self::display_name), falling back to the username
    pub fn full_name(&self) -> String {
        let name = self.display_name();
        if name.is_empty() {
            self.username.clone()
        } else {
            name
        }
    }
}

/// Resolved author identity attached to posts
#[derive(Debug, Clone, PartialEq)]
pub struct UserInfo {
    pub username: String,
    pub name: String,
}

impl UserInfo {
    pub fn unknown() -> Self {
        Self {
            username: "unknown".to_string(),
            name: "Unknown User".to_string(),
        }
    }
}

impl From<&MattermostUser> for UserInfo {
    fn from(user: &MattermostUser) -> Self {
        Self {
            username: user.username.clone(),
            name: user.full_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MattermostPost {
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub channel_id: String,
    /// Epoch milliseconds
    #[serde(default)]
    pub create_at: i64,
    /// Epoch milliseconds
    #[serde(default)]
    pub update_at: i64,
}

/// Search results, threads and channel pages all share this shape:
/// `order` is the display sequence, `posts` the lookup table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostList {
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default)]
    pub posts: HashMap<String, MattermostPost>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchPostsRequest<'a> {
    pub terms: &'a str,
    pub is_or_search: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchUsersRequest<'a> {
    pub term: &'a str,
    pub allow_inactive: bool,
}
