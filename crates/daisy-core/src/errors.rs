use std::path::PathBuf;

use thiserror::Error;

use crate::ports::DeviceError;

/// Fatal failure of a transfer session. Each variant names the path involved.
#[derive(Debug, Error)]
pub enum TransferError {
  #[error("could not extract {}: {reason}", path.display())]
  Extraction { path: PathBuf, reason: String },

  #[error("could not size staging directory {}: {reason}", path.display())]
  Sizing { path: PathBuf, reason: String },

  #[error("could not create directory {path} on the device: {reason}")]
  DirectoryCreate { path: String, reason: String },

  #[error("could not upload {} to {remote}: {reason}", local.display())]
  Upload { local: PathBuf, remote: String, reason: String },

  #[error("device disconnected")]
  DeviceDisconnected,
}

/// Generic error of the core services.
///
/// Upper layers (the CLI) map it to user messages.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("device error: {0}")]
  Device(String),

  #[error("device disconnected")]
  DeviceDisconnected,

  #[error("destination already exists: {0}")]
  DestinationExists(String),

  #[error(transparent)]
  Transfer(#[from] TransferError),
}

impl From<DeviceError> for CoreError {
  fn from(err: DeviceError) -> Self {
    match err {
      DeviceError::Disconnected => CoreError::DeviceDisconnected,
      other => CoreError::Device(other.to_string()),
    }
  }
}
