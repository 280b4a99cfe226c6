use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

/// Scratch directory holding one extracted archive.
///
/// Owned by exactly one session. [`remove`](Self::remove) is the normal exit;
/// dropping without it still deletes the tree, synchronously.
#[derive(Debug)]
pub struct StagingDirectory {
  path: PathBuf,
  removed: bool,
}

impl StagingDirectory {
  /// Creates a fresh, uniquely named directory under `root`.
  pub async fn create(root: &Path) -> io::Result<Self> {
    let path = root.join(format!("staging-{}", Uuid::new_v4()));
    tokio::fs::create_dir_all(&path).await?;
    debug!(path = %path.display(), "created staging directory");
    Ok(Self { path, removed: false })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Deletes the directory tree. Failures are logged, never returned.
  pub async fn remove(mut self) {
    self.removed = true;
    match tokio::fs::remove_dir_all(&self.path).await {
      Ok(()) => debug!(path = %self.path.display(), "removed staging directory"),
      Err(e) if e.kind() == io::ErrorKind::NotFound => {}
      Err(e) => warn!(path = %self.path.display(), error = %e, "failed to remove staging directory"),
    }
  }
}

impl Drop for StagingDirectory {
  fn drop(&mut self) {
    if self.removed {
      return;
    }
    if let Err(e) = std::fs::remove_dir_all(&self.path) {
      if e.kind() != io::ErrorKind::NotFound {
        warn!(path = %self.path.display(), error = %e, "failed to remove staging directory on drop");
      }
    }
  }
}
