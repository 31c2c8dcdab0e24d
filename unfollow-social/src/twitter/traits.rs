use async_trait::async_trait;

use crate::twitter::error::TwitterResult;
use crate::twitter::types::{FriendIds, Tweet};

/// The six remote operations a cleanup run needs.
///
/// `max_id` is an exclusive upper bound: only items with an id strictly
/// below it are returned. Listings come back newest first.
#[async_trait]
pub trait TwitterClient: Send + Sync {
    /// Up to `count` entries of the account's own timeline.
    async fn list_timeline(
        &self,
        count: u32,
        include_reshares: bool,
        max_id: Option<u64>,
    ) -> TwitterResult<Vec<Tweet>>;

    async fn delete_post(&self, id: u64) -> TwitterResult<()>;

    /// Up to `count` posts the account has liked.
    async fn list_likes(&self, count: u32, max_id: Option<u64>) -> TwitterResult<Vec<Tweet>>;

    async fn delete_like(&self, id: u64) -> TwitterResult<()>;

    /// Ids of up to `count` accounts the user follows, in a single call.
    async fn list_followed_ids(&self, count: u32) -> TwitterResult<FriendIds>;

    async fn delete_follow(&self, user_id: u64) -> TwitterResult<()>;
}
