//! Updating a single feed.
//!
//! For one named source the updater resolves its URL, fetches the items,
//! optionally purges the old articles, and writes every item it has not seen
//! before.  Only a failed lookup, fetch or directory creation aborts the
//! source; anything that goes wrong with one item is logged and counted as
//! skipped.

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{Result, UpdateError};
use crate::inbox::Inbox;
use crate::namer::article_file_name;
use crate::source::{FeedFetcher, FetchedItem};
use crate::store::ArticleStore;

/// Counters for one source after one update.
///
/// `downloaded + skipped == total` once the update has run to completion;
/// items whose write failed are counted as skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedUpdateResult {
    pub name: String,
    pub downloaded: usize,
    pub skipped: usize,
    pub total: usize,
}

impl FeedUpdateResult {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// Knobs for a whole update run.  The defaults match the classic behaviour:
/// every source at once, no time limit.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOptions {
    /// Upper bound on sources updated at the same time by
    /// [`FeedUpdater::update_all`].
    pub max_concurrent: Option<usize>,
    /// Give up on a source whose fetch takes longer than this.  Only the
    /// fetch is bounded; article writes are never cut short.
    pub fetch_timeout: Option<Duration>,
}

/// Runs feed updates against one configuration and one feed root.
///
/// Cheap to clone; clones share the configuration and the fetcher.
#[derive(Clone)]
pub struct FeedUpdater {
    config: Arc<Config>,
    fetcher: Arc<dyn FeedFetcher>,
    store: ArticleStore,
    inbox: Inbox,
    options: UpdateOptions,
}

impl FeedUpdater {
    pub fn new(config: Arc<Config>, fetcher: Arc<dyn FeedFetcher>) -> Self {
        let store = ArticleStore::new(&config.feed_directory);
        let inbox = Inbox::new(&config.feed_directory);
        Self {
            config,
            fetcher,
            store,
            inbox,
            options: UpdateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: UpdateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn options(&self) -> UpdateOptions {
        self.options
    }

    pub fn store(&self) -> &ArticleStore {
        &self.store
    }

    pub fn inbox(&self) -> &Inbox {
        &self.inbox
    }

    /// Empty the inbox.  Call once before updating any source.
    pub async fn initialise_new_article_directory(&self) -> io::Result<()> {
        self.inbox.reset().await
    }

    /// Update the source called `name`.
    ///
    /// With `purge` set the source's existing articles are deleted first, so
    /// the directory ends up holding exactly the current feed.
    pub async fn update_feed(&self, name: &str, purge: bool) -> Result<FeedUpdateResult> {
        let feed = self
            .config
            .feed_by_name(name)
            .ok_or_else(|| UpdateError::FeedNotFound {
                name: name.to_string(),
            })?;

        let items = self
            .fetch(&feed.url)
            .await
            .map_err(|source| UpdateError::Fetch {
                name: name.to_string(),
                source,
            })?;

        let mut result = FeedUpdateResult::new(name);
        result.total = items.len();

        if purge {
            if let Err(e) = self.store.purge(name).await {
                error!(feed = name, error = %e, "failed to delete existing articles");
            }
        }

        self.store
            .ensure_source_directory(name)
            .await
            .map_err(|source| UpdateError::Storage {
                name: name.to_string(),
                path: self.store.source_dir(name),
                source,
            })?;

        for item in &items {
            if self.save_item(name, item).await {
                result.downloaded += 1;
            } else {
                result.skipped += 1;
            }
        }

        info!(
            feed = name,
            downloaded = result.downloaded,
            skipped = result.skipped,
            total = result.total,
            "articles fetched"
        );

        Ok(result)
    }

    async fn fetch(&self, url: &str) -> anyhow::Result<Vec<FetchedItem>> {
        match self.options.fetch_timeout {
            None => self.fetcher.fetch(url).await,
            Some(limit) => tokio::time::timeout(limit, self.fetcher.fetch(url))
                .await
                .map_err(|_| anyhow!("timed out after {limit:?}"))?,
        }
    }

    /// Write one item if it is new.  Returns whether an article was written.
    async fn save_item(&self, feed: &str, item: &FetchedItem) -> bool {
        let file_name = article_file_name(&item.title);
        if file_name.is_empty() {
            warn!(feed, "skipping item with empty or invalid title");
            return false;
        }

        match self.store.exists(feed, &file_name).await {
            Ok(false) => {}
            Ok(true) => {
                debug!(feed, article = %file_name, "article already exists, skipping");
                return false;
            }
            Err(e) => {
                warn!(feed, article = %file_name, error = %e, "unable to check if article exists");
                return false;
            }
        }

        let path = match self
            .store
            .write(feed, &file_name, &item.article_content())
            .await
        {
            Ok(path) => path,
            Err(e) => {
                error!(feed, title = %item.title, error = %e, "failed to write article");
                return false;
            }
        };

        self.record_new(feed, &file_name, &path).await;
        true
    }

    async fn record_new(&self, feed: &str, file_name: &str, article: &Path) {
        let target = std::path::absolute(article).unwrap_or_else(|_| article.to_path_buf());
        if let Err(e) = self.inbox.record(feed, file_name, &target).await {
            warn!(
                feed,
                article = %target.display(),
                error = %e,
                "could not link newly downloaded article into the inbox"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
