use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use daisy_core::ports::{DeviceClient, DeviceError};
use daisy_core::services::remote_join;
use tracing::{debug, info};

/// A player that mounts as mass storage.
///
/// Remote path `/a/b` maps to `<root>/a/b`; `\` is accepted as a separator.
#[derive(Debug, Clone)]
pub struct LocalDevice {
  name: String,
  root: PathBuf,
  connected: bool,
}

impl LocalDevice {
  pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
    Self { name: name.into(), root: root.into(), connected: false }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  fn ensure_connected(&self) -> Result<(), DeviceError> {
    if self.connected { Ok(()) } else { Err(DeviceError::Disconnected) }
  }

  /// Maps a remote path below the mount point. `..` is refused outright.
  fn resolve(&self, remote: &str) -> Result<PathBuf, DeviceError> {
    let mut path = self.root.clone();
    for part in remote.split(['/', '\\']).filter(|p| !p.is_empty() && *p != ".") {
      if part == ".." {
        return Err(DeviceError::InvalidPath(remote.to_string()));
      }
      path.push(part);
    }
    Ok(path)
  }
}

fn map_io_error(remote: &str, err: io::Error) -> DeviceError {
  match err.kind() {
    io::ErrorKind::NotFound => DeviceError::NotFound(remote.to_string()),
    _ => DeviceError::Io(format!("{remote}: {err}")),
  }
}

#[async_trait]
impl DeviceClient for LocalDevice {
  async fn connect(&mut self) -> Result<(), DeviceError> {
    match tokio::fs::metadata(&self.root).await {
      Ok(meta) if meta.is_dir() => {
        self.connected = true;
        info!(device = %self.name, root = %self.root.display(), "device connected");
        Ok(())
      }
      Ok(_) => Err(DeviceError::NotFound(self.root.display().to_string())),
      Err(e) => Err(map_io_error(&self.root.display().to_string(), e)),
    }
  }

  async fn disconnect(&mut self) -> Result<(), DeviceError> {
    if self.connected {
      info!(device = %self.name, "device disconnected");
    }
    self.connected = false;
    Ok(())
  }

  fn is_connected(&self) -> bool {
    self.connected
  }

  async fn list_directories(&self, path: &str) -> Result<Vec<String>, DeviceError> {
    self.ensure_connected()?;
    let local = self.resolve(path)?;

    let mut names = Vec::new();
    let mut rd = tokio::fs::read_dir(&local).await.map_err(|e| map_io_error(path, e))?;
    while let Some(entry) = rd.next_entry().await.map_err(|e| map_io_error(path, e))? {
      let file_type = entry.file_type().await.map_err(|e| map_io_error(path, e))?;
      if file_type.is_dir() {
        names.push(entry.file_name().to_string_lossy().into_owned());
      }
    }
    names.sort();

    let parent = path.replace('\\', "/");
    Ok(names.iter().map(|name| remote_join(&parent, name)).collect())
  }

  async fn directory_exists(&self, path: &str) -> Result<bool, DeviceError> {
    self.ensure_connected()?;
    match tokio::fs::metadata(self.resolve(path)?).await {
      Ok(meta) => Ok(meta.is_dir()),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
      Err(e) => Err(map_io_error(path, e)),
    }
  }

  async fn create_directory(&self, path: &str) -> Result<(), DeviceError> {
    self.ensure_connected()?;
    tokio::fs::create_dir_all(self.resolve(path)?).await.map_err(|e| map_io_error(path, e))?;
    debug!(path, "created directory");
    Ok(())
  }

  async fn delete_directory(&self, path: &str, recursive: bool) -> Result<(), DeviceError> {
    self.ensure_connected()?;
    let local = self.resolve(path)?;
    if local == self.root {
      return Err(DeviceError::InvalidPath(path.to_string()));
    }

    let res = if recursive { tokio::fs::remove_dir_all(&local).await } else { tokio::fs::remove_dir(&local).await };
    res.map_err(|e| map_io_error(path, e))?;
    debug!(path, recursive, "deleted directory");
    Ok(())
  }

  async fn upload_file(&self, local: &Path, remote: &str) -> Result<(), DeviceError> {
    self.ensure_connected()?;
    let target = self.resolve(remote)?;
    tokio::fs::copy(local, &target).await.map_err(|e| map_io_error(remote, e))?;
    Ok(())
  }
}
