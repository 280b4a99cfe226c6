use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::warn;

use crate::FsError;

/// Deletes `path` if present and creates it again empty.
///
/// Used for the application's private scratch root at startup.
pub fn recreate_dir(path: &Path) -> Result<(), FsError> {
  match fs::remove_dir_all(path) {
    Ok(()) => {}
    Err(e) if e.kind() == ErrorKind::NotFound => {}
    Err(source) => return Err(FsError::Io { path: path.to_path_buf(), source }),
  }

  fs::create_dir_all(path).map_err(|source| FsError::Io { path: path.to_path_buf(), source })
}

/// Best-effort cleanup of the scratch root between operations.
///
/// Failures are logged and swallowed.
pub fn clear_dir(path: &Path) {
  if !path.exists() {
    return;
  }

  if let Err(e) = recreate_dir(path) {
    warn!(path = %path.display(), error = %e, "failed to clean scratch directory");
  }
}
