use std::path::{Path, PathBuf};

/// A candidate archive found by the scanner.
#[derive(Debug, Clone)]
pub struct ScannedFile {
  pub path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
  #[error("source directory does not exist: {}", .0.display())]
  MissingDirectory(PathBuf),

  #[error("io error: {0}")]
  Io(String),

  #[error("internal error: {0}")]
  Internal(String),
}

/// Port that enumerates archive files in a source directory.
///
/// Results come back in filesystem order.
#[async_trait::async_trait]
pub trait FileScanner: Send + Sync {
  async fn list_archives(&self, dir: &Path) -> Result<Vec<ScannedFile>, ScanError>;
}
