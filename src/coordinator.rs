//! Updating every configured feed at once.
//!
//! One task per source, all spawned together on a [`JoinSet`].  Results are
//! gathered as tasks finish, so their order follows completion, not the
//! configuration.  A source that fails is logged and simply has no entry in
//! the returned list.
//!
//! Sources only share the feed root, and each writes inside its own
//! directory, so tasks need no coordination beyond the join.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::error;

use crate::engine::{FeedUpdateResult, FeedUpdater};

impl FeedUpdater {
    /// Update every configured source concurrently.
    ///
    /// Honours [`UpdateOptions::max_concurrent`](crate::UpdateOptions) when
    /// set; otherwise every source starts immediately.
    pub async fn update_all(&self, purge: bool) -> Vec<FeedUpdateResult> {
        let feeds = &self.config().feeds;
        if feeds.is_empty() {
            return Vec::new();
        }

        let limit = self
            .options()
            .max_concurrent
            .map(|n| Arc::new(Semaphore::new(n.max(1))));

        let mut tasks = JoinSet::new();
        for feed in feeds {
            let updater = self.clone();
            let name = feed.name.clone();
            let limit = limit.clone();

            tasks.spawn(async move {
                let _permit = match limit {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };
                match updater.update_feed(&name, purge).await {
                    Ok(result) => Some(result),
                    Err(e) => {
                        error!(feed = %name, error = %e, "feed update failed");
                        None
                    }
                }
            });
        }

        let mut results = Vec::with_capacity(feeds.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(e) => error!(error = %e, "feed update task did not complete"),
            }
        }
        results
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
