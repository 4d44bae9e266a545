//! Error types.
//!
//! Only failures that abort a whole source (or a whole command) are errors.
//! Per-item problems are counted in [`FeedUpdateResult`](crate::FeedUpdateResult)
//! and logged instead.

use std::path::PathBuf;

use thiserror::Error;

/// Why updating a single source was abandoned.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// The name is not in the configured feed list.
    #[error("feed '{name}' not found")]
    FeedNotFound { name: String },

    /// Network failure, bad status or an unparseable document.
    #[error("fetch feed '{name}': {source}")]
    Fetch {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    /// The source's article directory could not be created.
    #[error("ensure feed directory for '{name}' at {}: {source}", path.display())]
    Storage {
        name: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loading, validating or saving the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve home directory")]
    NoHomeDirectory,

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("feed name cannot be empty")]
    EmptyName,

    #[error("feed URL cannot be empty")]
    EmptyUrl,

    #[error("feed name '{0}' is reserved")]
    ReservedName(String),

    #[error("feed named '{0}' already exists")]
    DuplicateFeed(String),
}

/// Reading or parsing an OPML subscription list.
#[derive(Debug, Error)]
pub enum OpmlError {
    #[error("read OPML file: {0}")]
    Io(#[from] std::io::Error),

    #[error("fetch OPML document: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed OPML document: {0}")]
    Xml(String),
}

pub type Result<T> = std::result::Result<T, UpdateError>;
