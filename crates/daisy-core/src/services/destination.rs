use tracing::info;

use crate::domain::FolderName;
use crate::errors::CoreError;
use crate::ports::DeviceClient;

/// What to do when the book folder already exists on the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
  #[default]
  Fail,
  /// Delete the existing folder recursively, then copy.
  Overwrite,
}

/// Joins a remote parent and a child name with exactly one `/`.
///
/// Backslashes in `parent` are normalized to `/`.
pub fn remote_join(parent: &str, name: &str) -> String {
  let mut joined = parent.replace('\\', "/");
  if !joined.ends_with('/') {
    joined.push('/');
  }
  joined.push_str(name);
  joined
}

fn last_component(path: &str) -> &str {
  path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

/// Resolves the remote folder a book is copied into and clears the way.
///
/// Returns the remote path to hand to the transfer engine.
pub async fn prepare_destination<D>(
  device: &D,
  target_folder: &str,
  folder_name: &FolderName,
  policy: ConflictPolicy,
) -> Result<String, CoreError>
where
  D: DeviceClient + ?Sized,
{
  if !device.is_connected() {
    return Err(CoreError::DeviceDisconnected);
  }

  let parent = target_folder.replace('\\', "/");
  let destination = remote_join(&parent, folder_name.as_str());

  let existing = device.list_directories(&parent).await?;
  let taken = existing.iter().any(|dir| last_component(dir) == folder_name.as_str());

  if taken {
    match policy {
      ConflictPolicy::Fail => return Err(CoreError::DestinationExists(destination)),
      ConflictPolicy::Overwrite => {
        info!(path = %destination, "replacing existing folder on device");
        device.delete_directory(&destination, true).await?;
      }
    }
  }

  Ok(destination)
}
