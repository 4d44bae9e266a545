//! The inbox: symlinks to the articles downloaded by the latest run.
//!
//! ```text
//! <root>/new/<article file name>  ->  <root>/<source>/<article file name>
//! ```
//!
//! The inbox is a convenience view, not an index.  It is wiped at the start
//! of every update run, entries are references rather than copies, and when
//! two sources produce the same file name in one run the later one wins.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::store::remove_all;

/// Name of the inbox directory under the feed root.
pub const NEW_ARTICLE_DIRECTORY: &str = "new";

#[derive(Debug, Clone)]
pub struct Inbox {
    dir: PathBuf,
}

impl Inbox {
    /// Inbox living under the feed root `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join(NEW_ARTICLE_DIRECTORY),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Delete every entry and recreate the empty inbox.
    ///
    /// Call once per run, before any source is updated.
    pub async fn reset(&self) -> io::Result<()> {
        remove_all(&self.dir).await?;
        fs::create_dir_all(&self.dir).await
    }

    /// Point the inbox entry `file_name` at `article`.
    ///
    /// An existing entry with the same name is replaced.  Callers treat an
    /// error as degraded visibility only; the article itself is already on
    /// disk.
    pub async fn record(&self, source: &str, file_name: &str, article: &Path) -> io::Result<PathBuf> {
        let link = self.dir.join(file_name);

        match fs::remove_file(&link).await {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                warn!(link = %link.display(), error = %e, "failed to remove existing inbox entry");
            }
            _ => {}
        }

        symlink(article, &link).await?;
        debug!(feed = source, link = %link.display(), "recorded new article");
        Ok(link)
    }
}

#[cfg(unix)]
async fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    fs::symlink(target, link).await
}

#[cfg(windows)]
async fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    fs::symlink_file(target, link).await
}
