use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;
use zip::ZipArchive;
use zip::result::ZipError;

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
  #[error("io error on {}: {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("not a readable zip archive: {0}")]
  Zip(#[from] ZipError),

  #[error("entry escapes the destination: {0}")]
  UnsafePath(String),
}

impl ArchiveError {
  fn io(path: &Path, source: io::Error) -> Self {
    ArchiveError::Io { path: path.to_path_buf(), source }
  }
}

/// A zip archive opened for random access.
pub struct BookArchive {
  path: PathBuf,
  zip: ZipArchive<BufReader<File>>,
}

impl BookArchive {
  /// Opens `path` and reads the central directory. Nothing is extracted.
  pub fn open(path: &Path) -> Result<Self, ArchiveError> {
    let file = File::open(path).map_err(|e| ArchiveError::io(path, e))?;
    let zip = ZipArchive::new(BufReader::new(file))?;
    Ok(Self { path: path.to_path_buf(), zip })
  }

  /// Index of the first file entry whose last path component equals `name`,
  /// ignoring ASCII case. Directories never match.
  pub fn find_entry_by_file_name(&self, name: &str) -> Option<usize> {
    (0..self.zip.len()).find(|&index| {
      self.zip.name_for_index(index).is_some_and(|entry| {
        let last = entry.rsplit(['/', '\\']).next().unwrap_or(entry);
        !entry.ends_with('/') && last.eq_ignore_ascii_case(name)
      })
    })
  }

  /// Copies the single entry at `index` into `dir`, flattened to its file
  /// name. Returns the written path.
  pub fn extract_entry(&mut self, index: usize, dir: &Path) -> Result<PathBuf, ArchiveError> {
    let mut entry = self.zip.by_index(index)?;
    let name = entry.enclosed_name().ok_or_else(|| ArchiveError::UnsafePath(entry.name().to_string()))?;
    let file_name = name.file_name().ok_or_else(|| ArchiveError::UnsafePath(entry.name().to_string()))?;
    let target = dir.join(file_name);

    let mut out = File::create(&target).map_err(|e| ArchiveError::io(&target, e))?;
    io::copy(&mut entry, &mut out).map_err(|e| ArchiveError::io(&target, e))?;
    Ok(target)
  }

  /// Extracts every entry below `dest`, keeping the archive's layout.
  ///
  /// Entries whose names would land outside `dest` abort the extraction.
  /// Returns the number of entries and the bytes written.
  pub fn unpack_all(&mut self, dest: &Path) -> Result<(usize, u64), ArchiveError> {
    let mut bytes = 0u64;

    for index in 0..self.zip.len() {
      let mut entry = self.zip.by_index(index)?;
      let rel = entry.enclosed_name().ok_or_else(|| ArchiveError::UnsafePath(entry.name().to_string()))?;
      let target = dest.join(rel);

      if entry.is_dir() {
        fs::create_dir_all(&target).map_err(|e| ArchiveError::io(&target, e))?;
        continue;
      }

      if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| ArchiveError::io(parent, e))?;
      }
      let mut out = File::create(&target).map_err(|e| ArchiveError::io(&target, e))?;
      bytes += io::copy(&mut entry, &mut out).map_err(|e| ArchiveError::io(&target, e))?;
    }

    debug!(archive = %self.path.display(), entries = self.zip.len(), bytes, "unpacked");
    Ok((self.zip.len(), bytes))
  }
}
