mod client;
mod posts;
mod teams;
pub mod types;
mod users;

pub use client::MattermostClient;
pub use posts::PostsApi;
pub use teams::TeamsApi;
pub use users::UsersApi;
