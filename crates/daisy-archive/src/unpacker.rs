use std::path::{Path, PathBuf};

use async_trait::async_trait;
use daisy_core::ports::{ArchiveUnpacker, UnpackError, UnpackStats};

use crate::book_archive::{ArchiveError, BookArchive};

/// Unpacks zip archives on the blocking pool.
#[derive(Debug, Clone, Default)]
pub struct ZipUnpacker;

impl ZipUnpacker {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl ArchiveUnpacker for ZipUnpacker {
  async fn unpack(&self, archive: &Path, dest: &Path) -> Result<UnpackStats, UnpackError> {
    let archive = PathBuf::from(archive);
    let dest = PathBuf::from(dest);

    tokio::task::spawn_blocking(move || unpack_sync(&archive, &dest))
      .await
      .map_err(|e| UnpackError::Internal(format!("unpack task failed: {e}")))?
  }
}

fn unpack_sync(archive: &Path, dest: &Path) -> Result<UnpackStats, UnpackError> {
  let mut zip = BookArchive::open(archive).map_err(map_archive_error)?;
  let (entries, bytes) = zip.unpack_all(dest).map_err(map_archive_error)?;
  Ok(UnpackStats { entries, bytes })
}

pub fn map_archive_error(err: ArchiveError) -> UnpackError {
  match err {
    ArchiveError::Io { .. } => UnpackError::Io(err.to_string()),
    ArchiveError::Zip(e) => UnpackError::Corrupt(e.to_string()),
    ArchiveError::UnsafePath(name) => UnpackError::UnsafePath(name),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::book_archive::tests::write_zip;
  use tempfile::tempdir;

  #[tokio::test]
  async fn unpacks_through_the_port() {
    let tmp = tempdir().unwrap();
    let archive = tmp.path().join("book1.zip");
    let (a, b) = (vec![0u8; 1000], vec![0u8; 2000]);
    write_zip(&archive, &[("a.mp3", a.as_slice()), ("b.mp3", b.as_slice())]);
    let dest = tmp.path().join("staging");

    let stats = ZipUnpacker::new().unpack(&archive, &dest).await.unwrap();

    assert_eq!(stats, UnpackStats { entries: 2, bytes: 3000 });
    assert_eq!(std::fs::metadata(dest.join("b.mp3")).unwrap().len(), 2000);
  }

  #[tokio::test]
  async fn corrupt_archive_maps_to_corrupt() {
    let tmp = tempdir().unwrap();
    let archive = tmp.path().join("bad.zip");
    std::fs::write(&archive, b"nope").unwrap();

    let err = ZipUnpacker::new().unpack(&archive, tmp.path()).await.unwrap_err();

    assert!(matches!(err, UnpackError::Corrupt(_)));
  }
}
