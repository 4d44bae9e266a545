//! Per-source article directories.
//!
//! Layout under the configured feed root:
//!
//! ```text
//! <root>/<source>/<article file name>
//! ```
//!
//! The filesystem is the only state.  Whether an article file exists decides
//! whether an item has been seen before; nothing else is recorded.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::warn;

/// Article files for every source, rooted at one directory.
#[derive(Debug, Clone)]
pub struct ArticleStore {
    root: PathBuf,
}

impl ArticleStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding `source`'s articles.
    pub fn source_dir(&self, source: &str) -> PathBuf {
        self.root.join(source)
    }

    /// Path of one article file.
    pub fn article_path(&self, source: &str, file_name: &str) -> PathBuf {
        self.source_dir(source).join(file_name)
    }

    /// Create the source's directory (and the root) if missing.
    pub async fn ensure_source_directory(&self, source: &str) -> io::Result<PathBuf> {
        let dir = self.source_dir(source);
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Whether an article with this name was already written.
    pub async fn exists(&self, source: &str, file_name: &str) -> io::Result<bool> {
        fs::try_exists(self.article_path(source, file_name)).await
    }

    /// Write a new article file.
    ///
    /// Fails with [`io::ErrorKind::AlreadyExists`] rather than overwriting.
    /// If writing fails after the file was created, the partial file is
    /// removed before the error is returned.
    pub async fn write(&self, source: &str, file_name: &str, content: &str) -> io::Result<PathBuf> {
        let path = self.article_path(source, file_name);
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        write_or_remove(file, &path, content.as_bytes()).await?;
        Ok(path)
    }

    /// Delete the source's directory and everything in it.
    ///
    /// A stray file at that path is removed as well; nothing there at all
    /// counts as already purged.
    pub async fn purge(&self, source: &str) -> io::Result<()> {
        remove_all(&self.source_dir(source)).await
    }
}

/// Clear the process file mode creation mask, so article directories, files
/// and inbox links are created group and world writable.
#[cfg(unix)]
pub fn clear_umask() {
    // SAFETY: umask only swaps the calling process's mask and cannot fail.
    unsafe {
        libc::umask(0);
    }
}

/// Write `content` through `writer`; on failure, remove the file at `path`
/// and return the write error.
async fn write_or_remove<W>(mut writer: W, path: &Path, content: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(content).await?;
        writer.flush().await
    }
    .await;

    if let Err(e) = written {
        drop(writer);
        if let Err(remove_err) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %remove_err, "failed to remove partial article");
        }
        return Err(e);
    }
    Ok(())
}

/// Remove whatever is at `path`: a directory tree, a file or a symlink.
/// Nothing there is not an error.
pub(crate) async fn remove_all(path: &Path) -> io::Result<()> {
    let meta = match fs::symlink_metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    let removed = if meta.is_dir() {
        fs::remove_dir_all(path).await
    } else {
        fs::remove_file(path).await
    };
    match removed {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
