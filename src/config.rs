//! Configuration file handling.
//!
//! The file lives at `~/.config/rssnix/config.toml` unless
//! `RSSNIX_CONFIG_HOME` names another directory.  A missing file is created
//! with defaults on first load.
//!
//! ```toml
//! feed_directory = "~/rssnix"
//! viewer = "vim"
//!
//! [[feeds]]
//! name = "lobsters"
//! url = "https://lobste.rs/rss"
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::inbox::NEW_ARTICLE_DIRECTORY;

/// Environment variable overriding the configuration directory.
pub const CONFIG_ENV_VAR: &str = "RSSNIX_CONFIG_HOME";

const DEFAULT_CONFIG_DIR: &str = ".config/rssnix";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_VIEWER: &str = "vim";
const DEFAULT_FEED_DIRECTORY: &str = "~/rssnix";

/// A named feed.  Names are unique and case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub name: String,
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// The file as written on disk, before `~` expansion and validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default = "default_feed_directory")]
    feed_directory: String,

    #[serde(default = "default_viewer")]
    viewer: String,

    #[serde(default)]
    feeds: Vec<FeedSource>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            feed_directory: default_feed_directory(),
            viewer: default_viewer(),
            feeds: Vec::new(),
        }
    }
}

fn default_feed_directory() -> String {
    DEFAULT_FEED_DIRECTORY.to_string()
}

fn default_viewer() -> String {
    DEFAULT_VIEWER.to_string()
}

/// Resolved configuration, ready to hand to the updater.
#[derive(Debug, Clone)]
pub struct Config {
    /// The file this configuration was loaded from; `add_feed` writes here.
    pub path: PathBuf,
    /// Root of all article directories and the inbox.
    pub feed_directory: PathBuf,
    /// Program used by `open`.
    pub viewer: String,
    pub feeds: Vec<FeedSource>,
}

impl Config {
    /// Load from the default location, honouring [`CONFIG_ENV_VAR`].
    pub fn load() -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;
        let dir = resolve_config_dir(&home, std::env::var(CONFIG_ENV_VAR).ok().as_deref());
        Self::load_from(&dir.join(CONFIG_FILE_NAME), &home)
    }

    /// Load `path`, creating it with defaults if missing.  `~` in the feed
    /// directory expands to `home`, and the feed directory is created.
    pub fn load_from(path: &Path, home: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!(path = %path.display(), "config file does not exist, creating");
            write_file(path, &ConfigFile::default())?;
            info!(path = %path.display(), "config file created");
        }

        let raw = read_file(path)?;

        let feed_directory = match raw.feed_directory.trim() {
            "" => expand_path(DEFAULT_FEED_DIRECTORY, home),
            dir => expand_path(dir, home),
        };
        fs::create_dir_all(&feed_directory).map_err(|source| ConfigError::Io {
            path: feed_directory.clone(),
            source,
        })?;

        let viewer = match raw.viewer.trim() {
            "" => DEFAULT_VIEWER.to_string(),
            v => v.to_string(),
        };

        let mut seen = HashSet::new();
        let mut feeds = Vec::with_capacity(raw.feeds.len());
        for feed in raw.feeds {
            let name = feed.name.trim();
            let url = feed.url.trim();
            if name.is_empty() {
                warn!(url, "feed has empty name; skipping");
                continue;
            }
            if url.is_empty() {
                warn!(feed = name, "feed has empty URL; skipping");
                continue;
            }
            if name == NEW_ARTICLE_DIRECTORY {
                warn!(feed = name, "feed name is reserved for the inbox; skipping");
                continue;
            }
            if !seen.insert(name.to_string()) {
                warn!(feed = name, "duplicate feed name; keeping the first");
                continue;
            }
            feeds.push(FeedSource::new(name, url));
        }

        if feeds.is_empty() {
            warn!("no feeds configured; use `rssnix add` or `rssnix import` to add feeds");
        }

        Ok(Self {
            path: path.to_path_buf(),
            feed_directory,
            viewer,
            feeds,
        })
    }

    pub fn feed_by_name(&self, name: &str) -> Option<&FeedSource> {
        self.feeds.iter().find(|f| f.name == name)
    }

    /// Add a feed and persist it to the configuration file.
    ///
    /// Name and URL are trimmed and must be non-empty; the name must not
    /// already be configured or clash with the inbox directory.
    pub fn add_feed(&mut self, name: &str, url: &str) -> Result<(), ConfigError> {
        let name = name.trim();
        let url = url.trim();
        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if url.is_empty() {
            return Err(ConfigError::EmptyUrl);
        }
        if name == NEW_ARTICLE_DIRECTORY {
            return Err(ConfigError::ReservedName(name.to_string()));
        }

        let mut raw = read_file(&self.path)?;
        if self.feed_by_name(name).is_some() || raw.feeds.iter().any(|f| f.name.trim() == name) {
            return Err(ConfigError::DuplicateFeed(name.to_string()));
        }

        let feed = FeedSource::new(name, url);
        raw.feeds.push(feed.clone());
        write_file(&self.path, &raw)?;
        self.feeds.push(feed);

        Ok(())
    }
}

/// Directory holding the config file: the override if set (with `~`
/// expanded, relative paths taken from `home`), else `~/.config/rssnix`.
pub fn resolve_config_dir(home: &Path, override_dir: Option<&str>) -> PathBuf {
    match override_dir.map(str::trim).filter(|d| !d.is_empty()) {
        None => home.join(DEFAULT_CONFIG_DIR),
        Some(dir) => {
            let expanded = expand_path(dir, home);
            if expanded.is_absolute() {
                expanded
            } else {
                home.join(expanded)
            }
        }
    }
}

/// Expand a leading `~` to `home`.
pub fn expand_path(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, file: &ConfigFile) -> Result<(), ConfigError> {
    let io_err = |source: std::io::Error| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let text = toml::to_string_pretty(file)?;
    fs::write(path, text).map_err(io_err)
}
