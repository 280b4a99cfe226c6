use std::path::Path;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
  #[error("device is not connected")]
  Disconnected,

  #[error("not found on device: {0}")]
  NotFound(String),

  #[error("invalid remote path: {0}")]
  InvalidPath(String),

  #[error("io error: {0}")]
  Io(String),

  #[error("device error: {0}")]
  Other(String),
}

/// Port over a portable player reachable through some transport.
///
/// Remote paths are `/`-separated strings rooted at the device root. How a
/// device is found and the handshake that precedes `connect` belong to the
/// adapter.
#[async_trait]
pub trait DeviceClient: Send + Sync {
  async fn connect(&mut self) -> Result<(), DeviceError>;

  async fn disconnect(&mut self) -> Result<(), DeviceError>;

  fn is_connected(&self) -> bool;

  /// Remote paths of the immediate child directories of `path`.
  async fn list_directories(&self, path: &str) -> Result<Vec<String>, DeviceError>;

  async fn directory_exists(&self, path: &str) -> Result<bool, DeviceError>;

  async fn create_directory(&self, path: &str) -> Result<(), DeviceError>;

  async fn delete_directory(&self, path: &str, recursive: bool) -> Result<(), DeviceError>;

  async fn upload_file(&self, local: &Path, remote: &str) -> Result<(), DeviceError>;
}
