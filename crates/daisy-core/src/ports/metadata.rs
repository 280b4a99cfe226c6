use std::path::Path;

use crate::domain::BookDescriptor;

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
  #[error("io error: {0}")]
  Io(String),

  #[error("corrupt archive: {0}")]
  Corrupt(String),

  #[error("internal error: {0}")]
  Internal(String),
}

/// Why an archive was not accepted as a talking book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotABookReason {
  /// The archive opened fine but has no navigation document.
  MissingMarker,
  /// The archive could not be opened or read.
  Unreadable(String),
}

/// Result of probing one archive. A negative is an expected outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookProbe {
  Book(BookDescriptor),
  NotABook(NotABookReason),
}

impl BookProbe {
  pub fn into_book(self) -> Option<BookDescriptor> {
    match self {
      BookProbe::Book(book) => Some(book),
      BookProbe::NotABook(_) => None,
    }
  }
}

impl From<MetadataError> for NotABookReason {
  fn from(err: MetadataError) -> Self {
    NotABookReason::Unreadable(err.to_string())
  }
}

/// Port that reads book metadata out of a downloaded archive.
///
/// Implementations must never fail: anything that prevents reading the
/// archive is reported as [`BookProbe::NotABook`].
#[async_trait::async_trait]
pub trait MetadataExtractor: Send + Sync {
  async fn extract_book_info(&self, archive: &Path) -> BookProbe;
}
