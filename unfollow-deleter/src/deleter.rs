use async_trait::async_trait;
use unfollow_common::ResourceKind;
use unfollow_social::twitter::TwitterResult;

use crate::{SweepError, SweepReport};

/// A listing owned by the account that can be drained page by page.
///
/// Pages arrive newest first; `fetch(Some(c))` must only return items with
/// an id strictly below `c`.
#[async_trait]
pub trait Collection: Send + Sync {
    type Item: Send + Sync;

    fn kind(&self) -> ResourceKind;

    async fn fetch(&self, max_id: Option<u64>) -> TwitterResult<Vec<Self::Item>>;

    fn id_of(&self, item: &Self::Item) -> u64;

    /// Whether `item` is removed. Everything is by default.
    fn should_delete(&self, _item: &Self::Item) -> bool {
        true
    }

    async fn delete(&self, item: &Self::Item) -> TwitterResult<()>;

    /// False for listings that come back whole in one call.
    fn paginated(&self) -> bool {
        true
    }
}

/// Fetch, delete, advance until a fetch returns nothing.
#[derive(Debug, Clone, Copy)]
pub struct BulkDeleter {
    max_pages: usize,
}

impl BulkDeleter {
    pub fn new(max_pages: usize) -> Self {
        Self { max_pages }
    }

    /// Drain `collection` starting below `start` (or from the newest item).
    ///
    /// The cursor after each page is the id of that page's last item. A page
    /// that would not move the cursor strictly downward, or a page beyond
    /// `max_pages`, aborts the run before anything on it is deleted.
    pub async fn drain<C>(&self, collection: &C, start: Option<u64>) -> Result<SweepReport, SweepError>
    where
        C: Collection + ?Sized,
    {
        let kind = collection.kind();
        let mut report = SweepReport::new(kind, start);
        let mut cursor = start;

        loop {
            let page = collection.fetch(cursor).await?;
            report.fetches += 1;

            let Some(last) = page.last().map(|item| collection.id_of(item)) else {
                tracing::debug!(%kind, fetches = report.fetches, "sweep.empty_page");
                break;
            };

            if report.pages >= self.max_pages {
                return Err(SweepError::PageLimit {
                    kind,
                    pages: report.pages,
                });
            }
            if let Some(previous) = cursor {
                if collection.paginated() && last >= previous {
                    return Err(SweepError::CursorStalled {
                        kind,
                        previous,
                        next: last,
                    });
                }
            }
            report.pages += 1;

            let deleted_before = report.deleted;
            for item in &page {
                report.seen += 1;
                if collection.should_delete(item) {
                    collection.delete(item).await?;
                    report.deleted += 1;
                }
            }

            tracing::info!(
                %kind,
                page = report.pages,
                items = page.len(),
                deleted = report.deleted - deleted_before,
                cursor = last,
                "sweep.page"
            );

            if !collection.paginated() {
                break;
            }
            cursor = Some(last);
            report.cursor = cursor;
        }

        Ok(report)
    }
}
