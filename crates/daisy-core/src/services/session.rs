use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use crate::domain::{CancelSignal, TransferOutcome, TransferReport};
use crate::errors::TransferError;
use crate::services::progress::{ProgressAggregator, ProgressSnapshot};
use crate::services::staging::StagingDirectory;

/// Why a session stopped before completing.
#[derive(Debug)]
pub(crate) enum Halt {
  Cancelled,
  Failed(TransferError),
}

impl From<TransferError> for Halt {
  fn from(err: TransferError) -> Self {
    Halt::Failed(err)
  }
}

/// State of one in-flight copy: where from, where to, and how far along.
#[derive(Debug)]
pub struct TransferSession {
  source: PathBuf,
  destination: String,
  staging: Option<StagingDirectory>,
  cancel: CancelSignal,
  progress: ProgressAggregator,
  files_uploaded: usize,
}

impl TransferSession {
  pub fn new(source: impl Into<PathBuf>, destination: impl Into<String>, cancel: CancelSignal) -> Self {
    Self {
      source: source.into(),
      destination: destination.into(),
      staging: None,
      cancel,
      progress: ProgressAggregator::new(Arc::new(AtomicU64::new(0))),
      files_uploaded: 0,
    }
  }

  pub fn source(&self) -> &Path {
    &self.source
  }

  pub fn destination(&self) -> &str {
    &self.destination
  }

  pub(crate) fn attach_staging(&mut self, staging: StagingDirectory) {
    self.staging = Some(staging);
  }

  pub(crate) fn take_staging(&mut self) -> Option<StagingDirectory> {
    self.staging.take()
  }

  pub(crate) fn checkpoint(&self) -> Result<(), Halt> {
    if self.cancel.is_cancelled() { Err(Halt::Cancelled) } else { Ok(()) }
  }

  pub(crate) fn progress_mut(&mut self) -> &mut ProgressAggregator {
    &mut self.progress
  }

  pub(crate) fn file_uploaded(&mut self, bytes: u64) -> Option<ProgressSnapshot> {
    self.files_uploaded += 1;
    self.progress.file_uploaded(bytes)
  }

  pub(crate) fn into_report(self, outcome: TransferOutcome) -> TransferReport {
    TransferReport {
      outcome,
      destination: self.destination,
      total_bytes: self.progress.total_bytes(),
      transferred_bytes: self.progress.transferred_bytes(),
      files_uploaded: self.files_uploaded,
      percent: self.progress.percent(),
    }
  }
}
