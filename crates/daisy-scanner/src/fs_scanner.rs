use std::path::{Path, PathBuf};

use daisy_fs::async_walker::{Filtering, WalkConfig, walk_filtered};
use futures::StreamExt;
use thiserror::Error;
use tracing::warn;

use crate::config::ScannerConfig;

#[derive(Debug, Error)]
pub enum ScannerError {
  #[error("source directory does not exist: {}", .0.display())]
  MissingDirectory(PathBuf),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Case-insensitive extension check against the configured list.
fn is_archive(path: &Path, cfg: &ScannerConfig) -> bool {
  let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
    return false;
  };
  cfg.archive_exts.iter().any(|wanted| wanted.eq_ignore_ascii_case(ext))
}

fn is_hidden(path: &Path) -> bool {
  path.file_name().is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

/// Lists the archives under `dir`, in the order the filesystem yields them.
///
/// A missing `dir` is an error. Errors on single entries are logged and the
/// entry is skipped.
pub async fn scan_archives(dir: &Path, cfg: &ScannerConfig) -> Result<Vec<PathBuf>, ScannerError> {
  match tokio::fs::metadata(dir).await {
    Ok(meta) if meta.is_dir() => {}
    Ok(_) => return Err(ScannerError::MissingDirectory(dir.to_path_buf())),
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
      return Err(ScannerError::MissingDirectory(dir.to_path_buf()));
    }
    Err(e) => return Err(e.into()),
  }

  let walk_cfg = WalkConfig { max_depth: cfg.max_depth, ..WalkConfig::recursive() };
  let ignore_hidden = cfg.ignore_hidden;

  let entries = walk_filtered(dir.to_path_buf(), walk_cfg, move |entry| {
    let hidden = ignore_hidden && is_hidden(entry.path());
    async move {
      if hidden {
        return Filtering::IgnoreDir;
      }
      Filtering::Continue
    }
  });
  tokio::pin!(entries);

  let mut found = Vec::new();

  while let Some(res) = entries.next().await {
    let entry = match res {
      Ok(entry) => entry,
      Err(e) => {
        warn!(error = %e, "walker error");
        continue;
      }
    };

    if entry.is_file() && is_archive(entry.path(), cfg) {
      found.push(entry.path);
    }
  }

  Ok(found)
}
