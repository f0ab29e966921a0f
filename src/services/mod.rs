/// Domain services composed by the request handlers.
pub mod comments;
pub mod feed;
pub mod follow;
pub mod posts;

pub use comments::CommentService;
pub use feed::{FeedService, Page};
pub use follow::FollowService;
pub use posts::PostService;
