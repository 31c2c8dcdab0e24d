//! Twitter/X v1.1 REST client for account cleanup.
//!
//! Every call is OAuth 1.0a-signed and issued exactly once; failures are
//! wrapped with the [`Operation`] that produced them and returned.
use async_trait::async_trait;
use serde::de::IgnoredAny;
use std::borrow::Cow;
use std::time::Duration;
use unfollow_common::Operation;
use unfollow_http::{Auth, HttpClient, HttpError, OAuth1Signer, RequestOpts};

use crate::twitter::error::{TwitterError, TwitterResult};
use crate::twitter::traits::TwitterClient;
use crate::twitter::types::{FriendIds, Tweet};

const USER_TIMELINE: &str = "1.1/statuses/user_timeline.json";
const FAVORITES_LIST: &str = "1.1/favorites/list.json";
const FAVORITES_DESTROY: &str = "1.1/favorites/destroy.json";
const FRIENDS_IDS: &str = "1.1/friends/ids.json";
const FRIENDSHIPS_DESTROY: &str = "1.1/friendships/destroy.json";

fn status_destroy_path(id: u64) -> String {
    format!("1.1/statuses/destroy/{id}.json")
}

/// The upstream `max_id` is inclusive; callers pass an exclusive bound.
fn inclusive_max_id(exclusive: u64) -> u64 {
    exclusive.saturating_sub(1)
}

#[derive(Clone)]
pub struct TwitterApi {
    http: HttpClient,
    signer: OAuth1Signer,
}

impl TwitterApi {
    pub fn new(base_url: &str, signer: OAuth1Signer, timeout: Duration) -> Result<Self, HttpError> {
        let http = HttpClient::new(base_url)?.with_timeout(timeout);
        Ok(Self { http, signer })
    }

    fn opts<'a>(&'a self, query: Vec<(&'a str, Cow<'a, str>)>) -> RequestOpts<'a> {
        RequestOpts {
            auth: Some(Auth::OAuth1(&self.signer)),
            query: Some(query),
            ..Default::default()
        }
    }

    fn page_query(count: u32, max_id: Option<u64>) -> Vec<(&'static str, Cow<'static, str>)> {
        let mut query = vec![("count", Cow::Owned(count.to_string()))];
        if let Some(bound) = max_id {
            query.push(("max_id", Cow::Owned(inclusive_max_id(bound).to_string())));
        }
        query
    }
}

#[async_trait]
impl TwitterClient for TwitterApi {
    async fn list_timeline(
        &self,
        count: u32,
        include_reshares: bool,
        max_id: Option<u64>,
    ) -> TwitterResult<Vec<Tweet>> {
        let op = Operation::ListTimeline { max_id };
        let mut query = Self::page_query(count, max_id);
        query.push(("include_rts", Cow::Borrowed(bool_param(include_reshares))));
        // Only the fields the run reads.
        query.push(("trim_user", Cow::Borrowed("true")));

        let tweets: Vec<Tweet> = self
            .http
            .get_json(USER_TIMELINE, self.opts(query))
            .await
            .map_err(|e| TwitterError::new(op, e))?;
        tracing::debug!(%op, returned = tweets.len(), "twitter.list_timeline");
        Ok(tweets)
    }

    async fn delete_post(&self, id: u64) -> TwitterResult<()> {
        let op = Operation::DeletePost { id };
        let _: IgnoredAny = self
            .http
            .post_json(&status_destroy_path(id), self.opts(vec![("trim_user", "true".into())]))
            .await
            .map_err(|e| TwitterError::new(op, e))?;
        tracing::debug!(%op, "twitter.deleted");
        Ok(())
    }

    async fn list_likes(&self, count: u32, max_id: Option<u64>) -> TwitterResult<Vec<Tweet>> {
        let op = Operation::ListLikes { max_id };
        let mut query = Self::page_query(count, max_id);
        query.push(("include_entities", Cow::Borrowed("false")));

        let tweets: Vec<Tweet> = self
            .http
            .get_json(FAVORITES_LIST, self.opts(query))
            .await
            .map_err(|e| TwitterError::new(op, e))?;
        tracing::debug!(%op, returned = tweets.len(), "twitter.list_likes");
        Ok(tweets)
    }

    async fn delete_like(&self, id: u64) -> TwitterResult<()> {
        let op = Operation::DeleteLike { id };
        let id = id.to_string();
        let _: IgnoredAny = self
            .http
            .post_json(
                FAVORITES_DESTROY,
                self.opts(vec![
                    ("id", Cow::Borrowed(id.as_str())),
                    ("include_entities", Cow::Borrowed("false")),
                ]),
            )
            .await
            .map_err(|e| TwitterError::new(op, e))?;
        tracing::debug!(%op, "twitter.deleted");
        Ok(())
    }

    async fn list_followed_ids(&self, count: u32) -> TwitterResult<FriendIds> {
        let op = Operation::ListFollowedIds;
        let ids: FriendIds = self
            .http
            .get_json(
                FRIENDS_IDS,
                self.opts(vec![
                    ("count", Cow::Owned(count.to_string())),
                    ("stringify_ids", Cow::Borrowed("false")),
                ]),
            )
            .await
            .map_err(|e| TwitterError::new(op, e))?;
        tracing::debug!(
            %op,
            returned = ids.ids.len(),
            next_cursor = ids.next_cursor,
            "twitter.list_followed_ids"
        );
        Ok(ids)
    }

    async fn delete_follow(&self, user_id: u64) -> TwitterResult<()> {
        let op = Operation::DeleteFollow { user_id };
        let user_id = user_id.to_string();
        let _: IgnoredAny = self
            .http
            .post_json(
                FRIENDSHIPS_DESTROY,
                self.opts(vec![("user_id", Cow::Borrowed(user_id.as_str()))]),
            )
            .await
            .map_err(|e| TwitterError::new(op, e))?;
        tracing::debug!(%op, "twitter.deleted");
        Ok(())
    }
}

fn bool_param(v: bool) -> &'static str {
    if v { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exclusive_bound_becomes_inclusive_max_id() {
        let q = TwitterApi::page_query(200, Some(101));
        assert_eq!(q[0], ("count", Cow::Borrowed("200")));
        assert_eq!(q[1], ("max_id", Cow::Borrowed("100")));
    }

    #[test]
    fn first_page_has_no_max_id() {
        let q = TwitterApi::page_query(200, None);
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn destroy_path_embeds_id() {
        assert_eq!(status_destroy_path(102), "1.1/statuses/destroy/102.json");
    }
}
