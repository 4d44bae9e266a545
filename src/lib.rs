//! rssnix — sync RSS and Atom feeds into plain files.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────────┐ spawn per feed ┌───────────┐ fetch() ┌───────────┐
//! │coordinator.rs│ ─────────────► │ engine.rs │ ──────► │  source/  │
//! │  (JoinSet)   │ ◄───────────── │ (1 feed)  │         │ (rss/atom)│
//! └──────────────┘    results     └───────────┘         └───────────┘
//!                                   │       │
//!                        write()    │       │  record()
//!                                   ▼       ▼
//!                          ┌──────────┐  ┌──────────┐
//!                          │ store.rs │  │ inbox.rs │
//!                          └──────────┘  └──────────┘
//! ```
//!
//! * **`source/`** — the [`FeedFetcher`] trait, the HTTP implementation and
//!   RSS / Atom conversion into [`FetchedItem`]s.
//! * **`namer`** — item title → file name.
//! * **`store`** — per-feed article directories.
//! * **`inbox`** — the `new/` directory of links to the latest downloads.
//! * **`engine`** — [`FeedUpdater::update_feed`], one feed at a time.
//! * **`coordinator`** — [`FeedUpdater::update_all`], every feed at once.
//! * **`config`** / **`opml`** — the configuration file and OPML import.
//!
//! On disk, relative to the configured feed directory:
//!
//! ```text
//! <feed>/<article>   one file per item: description, link, date, body
//! new/<article>      symlink to an article downloaded by the latest run
//! ```

pub mod config;
pub mod coordinator;
pub mod engine;
pub mod error;
pub mod inbox;
pub mod namer;
pub mod opml;
pub mod source;
pub mod store;

#[cfg(test)]
mod test_helpers;

pub use config::{Config, FeedSource};
pub use engine::{FeedUpdateResult, FeedUpdater, UpdateOptions};
pub use error::{ConfigError, OpmlError, UpdateError};
pub use inbox::Inbox;
pub use source::{FeedFetcher, FetchedItem, HttpFetcher};
pub use store::ArticleStore;
