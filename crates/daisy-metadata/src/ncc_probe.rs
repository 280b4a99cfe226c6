use std::path::{Path, PathBuf};

use async_trait::async_trait;
use daisy_archive::{ArchiveError, BookArchive};
use daisy_core::ports::{BookProbe, MetadataError, MetadataExtractor, NotABookReason};
use tracing::debug;

use crate::mapping::{decode_text, describe_book};
use crate::tag_keys::MARKER_FILE;

/// Reads title and author from a book's `ncc.html` without unpacking the rest.
///
/// The marker entry is copied into a throwaway directory under `scratch_root`
/// that is removed when the probe returns.
#[derive(Debug, Clone)]
pub struct NccProbe {
  scratch_root: PathBuf,
}

impl NccProbe {
  pub fn new(scratch_root: impl Into<PathBuf>) -> Self {
    Self { scratch_root: scratch_root.into() }
  }
}

#[async_trait]
impl MetadataExtractor for NccProbe {
  async fn extract_book_info(&self, archive: &Path) -> BookProbe {
    let archive = PathBuf::from(archive);
    let scratch_root = self.scratch_root.clone();

    let result = tokio::task::spawn_blocking(move || probe_sync(&archive, &scratch_root))
      .await
      .map_err(|e| MetadataError::Internal(format!("probe task failed: {e}")))
      .and_then(|res| res);

    match result {
      Ok(probe) => probe,
      Err(e) => {
        debug!(error = %e, "archive unreadable");
        BookProbe::NotABook(NotABookReason::from(e))
      }
    }
  }
}

fn probe_sync(archive: &Path, scratch_root: &Path) -> Result<BookProbe, MetadataError> {
  let mut zip = BookArchive::open(archive).map_err(map_archive_error)?;

  let Some(index) = zip.find_entry_by_file_name(MARKER_FILE) else {
    return Ok(BookProbe::NotABook(NotABookReason::MissingMarker));
  };

  std::fs::create_dir_all(scratch_root).map_err(|e| MetadataError::Io(e.to_string()))?;
  let workdir = tempfile::Builder::new()
    .prefix("probe-")
    .tempdir_in(scratch_root)
    .map_err(|e| MetadataError::Io(e.to_string()))?;

  let ncc_path = zip.extract_entry(index, workdir.path()).map_err(map_archive_error)?;
  let bytes = std::fs::read(&ncc_path).map_err(|e| MetadataError::Io(e.to_string()))?;

  Ok(BookProbe::Book(describe_book(archive, &decode_text(&bytes))))
}

fn map_archive_error(err: ArchiveError) -> MetadataError {
  match err {
    ArchiveError::Io { .. } => MetadataError::Io(err.to_string()),
    ArchiveError::Zip(_) | ArchiveError::UnsafePath(_) => MetadataError::Corrupt(err.to_string()),
  }
}
