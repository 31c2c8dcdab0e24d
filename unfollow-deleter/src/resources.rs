//! The three collections a cleanup run drains.
use async_trait::async_trait;
use unfollow_common::ResourceKind;
use unfollow_social::twitter::{Tweet, TwitterClient, TwitterResult};

use crate::deleter::Collection;

/// Reshares on the account's own timeline. Original posts are left alone.
pub struct Retweets<'a, C: ?Sized> {
    client: &'a C,
    page_size: u32,
}

impl<'a, C: TwitterClient + ?Sized> Retweets<'a, C> {
    pub fn new(client: &'a C, page_size: u32) -> Self {
        Self { client, page_size }
    }
}

#[async_trait]
impl<'a, C: TwitterClient + ?Sized> Collection for Retweets<'a, C> {
    type Item = Tweet;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Retweets
    }

    async fn fetch(&self, max_id: Option<u64>) -> TwitterResult<Vec<Tweet>> {
        self.client.list_timeline(self.page_size, true, max_id).await
    }

    fn id_of(&self, item: &Tweet) -> u64 {
        item.id
    }

    fn should_delete(&self, item: &Tweet) -> bool {
        item.is_reshare()
    }

    async fn delete(&self, item: &Tweet) -> TwitterResult<()> {
        self.client.delete_post(item.id).await
    }
}

/// Every post the account has liked.
pub struct Likes<'a, C: ?Sized> {
    client: &'a C,
    page_size: u32,
}

impl<'a, C: TwitterClient + ?Sized> Likes<'a, C> {
    pub fn new(client: &'a C, page_size: u32) -> Self {
        Self { client, page_size }
    }
}

#[async_trait]
impl<'a, C: TwitterClient + ?Sized> Collection for Likes<'a, C> {
    type Item = Tweet;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Likes
    }

    async fn fetch(&self, max_id: Option<u64>) -> TwitterResult<Vec<Tweet>> {
        self.client.list_likes(self.page_size, max_id).await
    }

    fn id_of(&self, item: &Tweet) -> u64 {
        item.id
    }

    async fn delete(&self, item: &Tweet) -> TwitterResult<()> {
        self.client.delete_like(item.id).await
    }
}

/// Outbound follow relationships, listed in a single capped call.
///
/// Accounts beyond the cap are left followed; the truncation is logged.
pub struct Friendships<'a, C: ?Sized> {
    client: &'a C,
    cap: u32,
}

impl<'a, C: TwitterClient + ?Sized> Friendships<'a, C> {
    pub fn new(client: &'a C, cap: u32) -> Self {
        Self { client, cap }
    }
}

#[async_trait]
impl<'a, C: TwitterClient + ?Sized> Collection for Friendships<'a, C> {
    type Item = u64;

    fn kind(&self) -> ResourceKind {
        ResourceKind::Friendships
    }

    async fn fetch(&self, _max_id: Option<u64>) -> TwitterResult<Vec<u64>> {
        let listing = self.client.list_followed_ids(self.cap).await?;
        if listing.is_truncated() {
            tracing::warn!(
                cap = self.cap,
                returned = listing.ids.len(),
                next_cursor = listing.next_cursor,
                "follow list truncated at cap; remaining follows are left in place"
            );
        }
        Ok(listing.ids)
    }

    fn id_of(&self, item: &u64) -> u64 {
        *item
    }

    async fn delete(&self, item: &u64) -> TwitterResult<()> {
        self.client.delete_follow(*item).await
    }

    fn paginated(&self) -> bool {
        false
    }
}
