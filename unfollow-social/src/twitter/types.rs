use serde::Deserialize;
use serde::de::IgnoredAny;

/// A timeline entry or liked post, trimmed to the fields a cleanup run reads.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Tweet {
    pub id: u64,
    /// Present only on reshare entries. The `retweeted` flag is not read: it
    /// is also true on the user's own originals that they retweeted.
    #[serde(default)]
    pub retweeted_status: Option<IgnoredAny>,
}

impl Tweet {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            retweeted_status: None,
        }
    }

    /// A reshare entry as it appears on the resharer's timeline.
    pub fn reshare(id: u64) -> Self {
        Self {
            retweeted_status: Some(IgnoredAny),
            ..Self::new(id)
        }
    }

    pub fn is_reshare(&self) -> bool {
        self.retweeted_status.is_some()
    }
}

/// Response of the followed-ids listing.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FriendIds {
    #[serde(default)]
    pub ids: Vec<u64>,
    /// Non-zero when more ids exist beyond this response.
    #[serde(default)]
    pub next_cursor: i64,
}

impl FriendIds {
    pub fn is_truncated(&self) -> bool {
        self.next_cursor != 0
    }
}
