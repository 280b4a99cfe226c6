use std::path::Path;

use async_trait::async_trait;
use daisy_core::ports::{FileScanner, ScanError, ScannedFile};

use crate::config::ScannerConfig;
use crate::fs_scanner::{ScannerError, scan_archives};

/// [`FileScanner`] over the local filesystem.
#[derive(Debug, Clone)]
pub struct FsScanner {
  cfg: ScannerConfig,
}

impl FsScanner {
  pub fn new(cfg: ScannerConfig) -> Self {
    Self { cfg }
  }
}

#[async_trait]
impl FileScanner for FsScanner {
  async fn list_archives(&self, dir: &Path) -> Result<Vec<ScannedFile>, ScanError> {
    let files = scan_archives(dir, &self.cfg).await.map_err(map_scanner_error)?;

    Ok(files.into_iter().map(|path| ScannedFile { path }).collect())
  }
}

fn map_scanner_error(err: ScannerError) -> ScanError {
  match err {
    ScannerError::MissingDirectory(path) => ScanError::MissingDirectory(path),
    ScannerError::Io(e) => ScanError::Io(e.to_string()),
  }
}
