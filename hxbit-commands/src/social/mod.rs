pub mod feed;
pub mod follow;
pub mod friend;
pub mod leaderboard;
pub mod post;
pub mod unfollow;
