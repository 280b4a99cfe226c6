use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum UnpackError {
  #[error("io error: {0}")]
  Io(String),

  #[error("corrupt archive: {0}")]
  Corrupt(String),

  #[error("entry escapes the destination: {0}")]
  UnsafePath(String),

  #[error("internal error: {0}")]
  Internal(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpackStats {
  pub entries: usize,
  pub bytes: u64,
}

/// Port that fully unpacks an archive into a local directory.
#[async_trait::async_trait]
pub trait ArchiveUnpacker: Send + Sync {
  async fn unpack(&self, archive: &Path, dest: &Path) -> Result<UnpackStats, UnpackError>;
}
