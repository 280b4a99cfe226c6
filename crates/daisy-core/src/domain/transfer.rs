use std::fmt;

use crate::errors::TransferError;

/// Lifecycle of one transfer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferPhase {
  Idle,
  Extracting,
  SizingStaging,
  CreatingDestination,
  CopyingFiles,
  Completed,
  Cancelled,
  Failed,
}

impl fmt::Display for TransferPhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      Self::Idle => "Idle",
      Self::Extracting => "Extracting",
      Self::SizingStaging => "Sizing",
      Self::CreatingDestination => "Creating destination",
      Self::CopyingFiles => "Copying",
      Self::Completed => "Completed",
      Self::Cancelled => "Cancelled",
      Self::Failed => "Failed",
    };
    f.write_str(label)
  }
}

/// How a session ended.
#[derive(Debug)]
pub enum TransferOutcome {
  Completed,
  /// The user raised the cancel signal. Not an error.
  Cancelled,
  Failed(TransferError),
}

impl TransferOutcome {
  pub fn phase(&self) -> TransferPhase {
    match self {
      Self::Completed => TransferPhase::Completed,
      Self::Cancelled => TransferPhase::Cancelled,
      Self::Failed(_) => TransferPhase::Failed,
    }
  }

  pub fn is_success(&self) -> bool {
    matches!(self, Self::Completed)
  }
}

/// Final accounting of a session, handed back to the caller.
#[derive(Debug)]
pub struct TransferReport {
  pub outcome: TransferOutcome,
  pub destination: String,
  pub total_bytes: u64,
  pub transferred_bytes: u64,
  pub files_uploaded: usize,
  /// Last percentage shown to the user.
  pub percent: u8,
}
