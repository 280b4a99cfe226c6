use std::path::Path;

use futures::StreamExt;

use crate::FsError;
use crate::async_walker::{WalkConfig, walk};

/// Sums the sizes of every regular file below `root`.
///
/// Any unreadable entry fails the whole computation.
pub async fn dir_size(root: &Path) -> Result<u64, FsError> {
  let entries = walk(root.to_path_buf(), WalkConfig::recursive());
  tokio::pin!(entries);

  let mut total = 0u64;

  while let Some(res) = entries.next().await {
    let entry = res.map_err(|e| FsError::Walker(format!("{}: {e}", root.display())))?;
    if !entry.is_file() {
      continue;
    }

    let meta = tokio::fs::metadata(&entry.path)
      .await
      .map_err(|source| FsError::Io { path: entry.path.clone(), source })?;
    total += meta.len();
  }

  Ok(total)
}
