use std::path::Path;

use tracing::{debug, info};

use crate::domain::{BookDescriptor, CatalogEntry};
use crate::ports::{BookProbe, FileScanner, MetadataExtractor, ScanError, ScannedFile};

/// Shown when the source directory holds no archive at all.
pub const NO_ARCHIVES_TEXT: &str = "No archive files found.";
/// Shown when there are archives but none of them is a talking book.
pub const NO_BOOKS_TEXT: &str = "No talking books found.";

/// Builds the book catalog of a source directory.
pub struct ArchiveScanner<S, M>
where
  S: FileScanner,
  M: MetadataExtractor,
{
  scanner: S,
  metadata: M,
}

impl<S, M> ArchiveScanner<S, M>
where
  S: FileScanner,
  M: MetadataExtractor,
{
  pub fn new(scanner: S, metadata: M) -> Self {
    Self { scanner, metadata }
  }

  /// Probes every archive in `dir`, in the order the scanner lists them.
  ///
  /// Archives that are not books are skipped; only a missing or unreadable
  /// directory fails the scan.
  pub async fn scan(&self, dir: &Path) -> Result<Vec<BookDescriptor>, ScanError> {
    let archives = self.scanner.list_archives(dir).await?;
    Ok(self.probe_all(&archives).await)
  }

  /// Like [`scan`](Self::scan), with a placeholder row when nothing was found.
  pub async fn catalog(&self, dir: &Path) -> Result<Vec<CatalogEntry>, ScanError> {
    let archives = self.scanner.list_archives(dir).await?;
    if archives.is_empty() {
      return Ok(vec![CatalogEntry::Placeholder(NO_ARCHIVES_TEXT.to_string())]);
    }

    let books = self.probe_all(&archives).await;
    if books.is_empty() {
      return Ok(vec![CatalogEntry::Placeholder(NO_BOOKS_TEXT.to_string())]);
    }

    Ok(books.into_iter().map(CatalogEntry::Book).collect())
  }

  async fn probe_all(&self, archives: &[ScannedFile]) -> Vec<BookDescriptor> {
    let mut books = Vec::new();
    let mut skipped = 0usize;

    for archive in archives {
      let path = archive.path.as_path();
      match self.metadata.extract_book_info(path).await {
        BookProbe::Book(book) => {
          debug!(path = %path.display(), title = book.title(), "found talking book");
          books.push(book);
        }
        BookProbe::NotABook(reason) => {
          debug!(path = %path.display(), ?reason, "skipping archive");
          skipped += 1;
        }
      }
    }

    info!(books = books.len(), skipped, "scan finished");
    books
  }
}
