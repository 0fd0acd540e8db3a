mod users;

pub use users::UserCache;
