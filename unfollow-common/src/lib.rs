//! Common types and utilities shared across the unfollow crates.
//!
//! This crate holds the small vocabulary every other crate speaks (which
//! collection is being cleaned up, which remote call failed) plus the
//! centralised tracing setup. It stays dependency-light so that the HTTP,
//! social and deleter crates can all depend on it.
//!
//! # Overview
//!
//! - [`ResourceKind`]: the three collections a run drains
//! - [`Operation`]: a single remote call, used to label failures
//! - [`observability`]: logging initialisation for the binary and tests
//!
//! # Examples
//!
//! ```rust
//! use unfollow_common::{Operation, ResourceKind};
//!
//! assert_eq!(ResourceKind::Retweets.to_string(), "retweets");
//! assert_eq!(Operation::DeletePost { id: 102 }.to_string(), "delete_post(102)");
//! ```
use std::fmt;

pub mod observability;

/// Collection owned by the authenticated account that a run drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Reshared posts on the user's own timeline.
    Retweets,
    /// Posts the user has liked.
    Likes,
    /// Outbound follow relationships.
    Friendships,
}

impl ResourceKind {
    /// Run order used by the binary.
    pub const ALL: [ResourceKind; 3] = [Self::Retweets, Self::Likes, Self::Friendships];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Retweets => "retweets",
            Self::Likes => "likes",
            Self::Friendships => "friendships",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One remote call against the account.
///
/// Every API failure carries the operation that produced it so the fatal
/// diagnostic can name exactly what went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListTimeline { max_id: Option<u64> },
    DeletePost { id: u64 },
    ListLikes { max_id: Option<u64> },
    DeleteLike { id: u64 },
    ListFollowedIds,
    DeleteFollow { user_id: u64 },
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListTimeline { max_id: None } => f.write_str("list_timeline"),
            Self::ListTimeline { max_id: Some(id) } => write!(f, "list_timeline(max_id={id})"),
            Self::DeletePost { id } => write!(f, "delete_post({id})"),
            Self::ListLikes { max_id: None } => f.write_str("list_likes"),
            Self::ListLikes { max_id: Some(id) } => write!(f, "list_likes(max_id={id})"),
            Self::DeleteLike { id } => write!(f, "delete_like({id})"),
            Self::ListFollowedIds => f.write_str("list_followed_ids"),
            Self::DeleteFollow { user_id } => write!(f, "delete_follow({user_id})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_cursor_when_present() {
        assert_eq!(
            Operation::ListTimeline { max_id: Some(101) }.to_string(),
            "list_timeline(max_id=101)"
        );
        assert_eq!(Operation::ListLikes { max_id: None }.to_string(), "list_likes");
    }

    #[test]
    fn run_order_is_retweets_likes_friendships() {
        let names: Vec<String> = ResourceKind::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["retweets", "likes", "friendships"]);
    }
}
