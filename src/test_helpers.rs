//! Shared fixtures for the engine and coordinator tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tempfile::TempDir;

use crate::config::{Config, FeedSource};
use crate::engine::FeedUpdater;
use crate::source::{FeedFetcher, FetchedItem};

/// A fetcher that serves canned responses keyed by URL.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: Mutex<HashMap<String, std::result::Result<Vec<FetchedItem>, String>>>,
    requested: Mutex<Vec<String>>,
    delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_items(&self, url: &str, items: Vec<FetchedItem>) {
        self.responses.lock().unwrap().insert(url.to_string(), Ok(items));
    }

    pub fn set_error(&self, url: &str, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(message.to_string()));
    }

    /// Make every fetch sleep this long before answering.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// URLs fetched so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    /// Highest number of fetches that were running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FeedFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<FetchedItem>> {
        self.requested.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match self.responses.lock().unwrap().get(url) {
            Some(Ok(items)) => Ok(items.clone()),
            Some(Err(message)) => Err(anyhow!("{message}")),
            None => Err(anyhow!("no response scripted for {url}")),
        }
    }
}

/// An item with a title and link and fixed filler for the other fields.
pub fn item(title: &str, link: &str) -> FetchedItem {
    FetchedItem {
        title: title.to_string(),
        link: link.to_string(),
        description: format!("About {title}"),
        content: String::new(),
        published: None,
    }
}

/// An updater over `feeds` whose feed root is `<tmp>/feeds` (not yet
/// created).  Keep the `TempDir` alive for the duration of the test.
pub fn test_updater(feeds: Vec<FeedSource>, fetcher: Arc<ScriptedFetcher>) -> (FeedUpdater, TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config {
        path: tmp.path().join("config.toml"),
        feed_directory: tmp.path().join("feeds"),
        viewer: "vim".to_string(),
        feeds,
    };
    (FeedUpdater::new(Arc::new(config), fetcher), tmp)
}
