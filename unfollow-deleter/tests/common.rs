#![allow(dead_code)]

use std::sync::{Mutex, OnceLock};

use async_trait::async_trait;
use unfollow_common::observability::{init_logging, LogConfig, LogFormat};
use unfollow_common::{Operation, ResourceKind};
use unfollow_http::HttpError;
use unfollow_social::twitter::{FriendIds, Tweet, TwitterClient, TwitterError, TwitterResult};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "unfollow-tests",
            log_dir: Some(std::env::temp_dir().join("unfollow-tests")),
            emit_stderr: true,
            format: LogFormat::from_env(),
            default_filter: "debug",
        };
        init_logging(config).unwrap_or_default()
    });
}

/// Collection a recorded call belongs to.
pub fn kind_of(op: &Operation) -> ResourceKind {
    match op {
        Operation::ListTimeline { .. } | Operation::DeletePost { .. } => ResourceKind::Retweets,
        Operation::ListLikes { .. } | Operation::DeleteLike { .. } => ResourceKind::Likes,
        Operation::ListFollowedIds | Operation::DeleteFollow { .. } => ResourceKind::Friendships,
    }
}

pub fn is_delete(op: &Operation) -> bool {
    matches!(
        op,
        Operation::DeletePost { .. } | Operation::DeleteLike { .. } | Operation::DeleteFollow { .. }
    )
}

#[derive(Default)]
struct State {
    timeline: Vec<Tweet>,
    likes: Vec<Tweet>,
    follows: Vec<u64>,
    calls: Vec<Operation>,
}

/// In-memory account. Listings are newest first and honour `max_id` as an
/// exclusive bound; deletes really remove items.
#[derive(Default)]
pub struct FakeAccount {
    state: Mutex<State>,
    fail_on: Option<Operation>,
}

impl FakeAccount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeline(self, mut tweets: Vec<Tweet>) -> Self {
        tweets.sort_by(|a, b| b.id.cmp(&a.id));
        self.state.lock().unwrap().timeline = tweets;
        self
    }

    /// Liked posts with ids `newest, newest-1, ...` (`count` of them).
    pub fn with_likes(self, newest: u64, count: u64) -> Self {
        self.state.lock().unwrap().likes = (0..count).map(|i| Tweet::new(newest - i)).collect();
        self
    }

    pub fn with_follows(self, ids: Vec<u64>) -> Self {
        self.state.lock().unwrap().follows = ids;
        self
    }

    /// Make exactly this call fail.
    pub fn failing_on(mut self, op: Operation) -> Self {
        self.fail_on = Some(op);
        self
    }

    pub fn calls(&self) -> Vec<Operation> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Operation) -> bool) -> usize {
        self.calls().iter().filter(|op| pred(op)).count()
    }

    pub fn timeline_ids(&self) -> Vec<u64> {
        self.state.lock().unwrap().timeline.iter().map(|t| t.id).collect()
    }

    pub fn remaining_likes(&self) -> usize {
        self.state.lock().unwrap().likes.len()
    }

    pub fn remaining_follows(&self) -> usize {
        self.state.lock().unwrap().follows.len()
    }

    fn record(&self, op: Operation) -> TwitterResult<()> {
        self.state.lock().unwrap().calls.push(op);
        if self.fail_on == Some(op) {
            return Err(TwitterError::new(
                op,
                HttpError::Network("injected failure".into()),
            ));
        }
        Ok(())
    }
}

fn page(items: &[Tweet], count: u32, max_id: Option<u64>) -> Vec<Tweet> {
    items
        .iter()
        .filter(|t| max_id.map_or(true, |bound| t.id < bound))
        .take(count as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl TwitterClient for FakeAccount {
    async fn list_timeline(
        &self,
        count: u32,
        _include_reshares: bool,
        max_id: Option<u64>,
    ) -> TwitterResult<Vec<Tweet>> {
        self.record(Operation::ListTimeline { max_id })?;
        Ok(page(&self.state.lock().unwrap().timeline, count, max_id))
    }

    async fn delete_post(&self, id: u64) -> TwitterResult<()> {
        self.record(Operation::DeletePost { id })?;
        self.state.lock().unwrap().timeline.retain(|t| t.id != id);
        Ok(())
    }

    async fn list_likes(&self, count: u32, max_id: Option<u64>) -> TwitterResult<Vec<Tweet>> {
        self.record(Operation::ListLikes { max_id })?;
        Ok(page(&self.state.lock().unwrap().likes, count, max_id))
    }

    async fn delete_like(&self, id: u64) -> TwitterResult<()> {
        self.record(Operation::DeleteLike { id })?;
        self.state.lock().unwrap().likes.retain(|t| t.id != id);
        Ok(())
    }

    async fn list_followed_ids(&self, count: u32) -> TwitterResult<FriendIds> {
        self.record(Operation::ListFollowedIds)?;
        let state = self.state.lock().unwrap();
        let ids: Vec<u64> = state.follows.iter().take(count as usize).copied().collect();
        let next_cursor = if state.follows.len() > ids.len() { 1 } else { 0 };
        Ok(FriendIds { ids, next_cursor })
    }

    async fn delete_follow(&self, user_id: u64) -> TwitterResult<()> {
        self.record(Operation::DeleteFollow { user_id })?;
        self.state.lock().unwrap().follows.retain(|id| *id != user_id);
        Ok(())
    }
}
