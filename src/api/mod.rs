pub mod comments;
pub mod models;

pub use comments::CommentClient;
pub use models::*;
