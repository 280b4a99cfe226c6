use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Longest folder name, in characters, created on the device.
pub const FOLDER_NAME_MAX_CHARS: usize = 50;

/// Used when a title sanitizes down to nothing.
const EMPTY_FOLDER_FALLBACK: &str = "book";

/// Characters rejected in a file name by at least one of the filesystems a
/// player may be formatted with (FAT/exFAT/NTFS are the strictest).
fn is_reserved(c: char) -> bool {
  matches!(c, '"' | '<' | '>' | '|' | ':' | '*' | '?' | '\\' | '/') || c.is_ascii_control()
}

/// FAT and NTFS drop trailing dots and spaces, and `.`/`..` name the current
/// and parent directories.
fn is_trimmed_suffix(c: char) -> bool {
  c == '.' || c == ' '
}

/// A folder name that is safe to create on the device.
///
/// Always non-empty, free of reserved characters, never ending in a dot or a
/// space and at most [`FOLDER_NAME_MAX_CHARS`] characters long.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FolderName(String);

impl FolderName {
  /// Replaces every reserved character with `_`, truncates, then strips
  /// trailing dots and spaces.
  pub fn from_title(title: &str) -> Self {
    let sanitized: String =
      title.chars().map(|c| if is_reserved(c) { '_' } else { c }).take(FOLDER_NAME_MAX_CHARS).collect();
    let trimmed = sanitized.trim_end_matches(is_trimmed_suffix);

    if trimmed.is_empty() { FolderName(EMPTY_FOLDER_FALLBACK.to_string()) } else { FolderName(trimmed.to_string()) }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl TryFrom<String> for FolderName {
  type Error = String;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    let valid = !value.is_empty()
      && value.chars().count() <= FOLDER_NAME_MAX_CHARS
      && !value.chars().any(is_reserved)
      && !value.ends_with(is_trimmed_suffix);

    if valid { Ok(FolderName(value)) } else { Err(format!("invalid folder name: {value:?}")) }
  }
}

impl From<FolderName> for String {
  fn from(name: FolderName) -> Self {
    name.0
  }
}

impl fmt::Display for FolderName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// One discovered talking book. Immutable once built by a scan pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDescriptor {
  archive_path: PathBuf,
  title: String,
  author: String,
  folder_name: FolderName,
}

impl BookDescriptor {
  /// The folder name is always derived from the title.
  pub fn new(archive_path: impl Into<PathBuf>, title: impl Into<String>, author: impl Into<String>) -> Self {
    let title = title.into();
    let folder_name = FolderName::from_title(&title);
    Self { archive_path: archive_path.into(), title, author: author.into(), folder_name }
  }

  pub fn archive_path(&self) -> &Path {
    &self.archive_path
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn author(&self) -> &str {
    &self.author
  }

  pub fn folder_name(&self) -> &FolderName {
    &self.folder_name
  }
}

impl fmt::Display for BookDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} - {}", self.title, self.author)
  }
}

/// A row of the catalog shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
  /// Informational text, not selectable for transfer.
  Placeholder(String),
  Book(BookDescriptor),
}

impl CatalogEntry {
  pub fn as_book(&self) -> Option<&BookDescriptor> {
    match self {
      CatalogEntry::Book(book) => Some(book),
      CatalogEntry::Placeholder(_) => None,
    }
  }
}

impl fmt::Display for CatalogEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CatalogEntry::Placeholder(text) => f.write_str(text),
      CatalogEntry::Book(book) => fmt::Display::fmt(book, f),
    }
  }
}
