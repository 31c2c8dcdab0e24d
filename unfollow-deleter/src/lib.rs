//! Bulk deletion of an account's reshares, likes, and follow relationships.
//!
//! [`BulkDeleter`] drives any [`Collection`] through fetch, delete, advance
//! cycles until the collection comes back empty. The three collections a
//! run cleans up live in [`resources`], and [`run_all`] sequences them.
//!
//! Failures are fatal: the first error from any fetch or delete stops the
//! current collection and every collection after it.
use thiserror::Error;
use unfollow_common::ResourceKind;
use unfollow_social::twitter::{TwitterClient, TwitterError};

pub mod deleter;
pub mod resources;

pub use deleter::{BulkDeleter, Collection};
pub use resources::{Friendships, Likes, Retweets};

/// Page size used for the timeline and likes listings.
pub const PAGE_SIZE: u32 = 200;
/// Upper bound on ids returned by the single follow listing call.
pub const FOLLOW_CAP: u32 = 5000;
pub const DEFAULT_MAX_PAGES: usize = 1000;

#[derive(Debug, Error)]
pub enum SweepError {
    #[error(transparent)]
    Api(#[from] TwitterError),
    #[error("{kind}: listing did not move past cursor {previous} (page ended at {next})")]
    CursorStalled {
        kind: ResourceKind,
        previous: u64,
        next: u64,
    },
    #[error("{kind}: stopped after {pages} pages without reaching an empty page")]
    PageLimit { kind: ResourceKind, pages: usize },
}

/// Tuning for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOptions {
    pub page_size: u32,
    pub follow_cap: u32,
    /// Maximum number of non-empty pages processed per collection.
    pub max_pages: usize,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            follow_cap: FOLLOW_CAP,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

/// Outcome of draining one collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub kind: ResourceKind,
    /// Listing calls issued, including the final empty one.
    pub fetches: usize,
    /// Non-empty pages processed.
    pub pages: usize,
    pub seen: usize,
    pub deleted: usize,
    /// Id of the oldest item seen; `None` if nothing was ever listed.
    pub cursor: Option<u64>,
}

impl SweepReport {
    pub fn new(kind: ResourceKind, cursor: Option<u64>) -> Self {
        Self {
            kind,
            fetches: 0,
            pages: 0,
            seen: 0,
            deleted: 0,
            cursor,
        }
    }
}

/// Drain retweets, then likes, then friendships.
///
/// Each collection runs to completion before the next starts; an error
/// returns immediately and later collections are never touched.
pub async fn run_all<C>(client: &C, options: &SweepOptions) -> Result<Vec<SweepReport>, SweepError>
where
    C: TwitterClient + ?Sized,
{
    let deleter = BulkDeleter::new(options.max_pages);
    let mut reports = Vec::with_capacity(ResourceKind::ALL.len());

    for kind in ResourceKind::ALL {
        tracing::info!(%kind, "sweep.start");
        let report = match kind {
            ResourceKind::Retweets => {
                deleter
                    .drain(&Retweets::new(client, options.page_size), None)
                    .await?
            }
            ResourceKind::Likes => {
                deleter
                    .drain(&Likes::new(client, options.page_size), None)
                    .await?
            }
            ResourceKind::Friendships => {
                deleter
                    .drain(&Friendships::new(client, options.follow_cap), None)
                    .await?
            }
        };
        tracing::info!(
            %kind,
            fetches = report.fetches,
            seen = report.seen,
            deleted = report.deleted,
            "sweep.done"
        );
        reports.push(report);
    }

    Ok(reports)
}
