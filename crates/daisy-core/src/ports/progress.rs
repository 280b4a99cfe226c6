use std::sync::Arc;

use crate::domain::TransferReport;
use crate::services::ProgressSnapshot;

/// Receives progress updates from a running transfer.
///
/// Called synchronously from the task driving the transfer; implementations
/// that touch a UI must hop to their own context.
pub trait ProgressListener: Send + Sync {
  fn on_progress(&self, snapshot: &ProgressSnapshot);

  fn on_finished(&self, _report: &TransferReport) {}
}

impl ProgressListener for () {
  fn on_progress(&self, _snapshot: &ProgressSnapshot) {}
}

impl<L: ProgressListener + ?Sized> ProgressListener for Arc<L> {
  fn on_progress(&self, snapshot: &ProgressSnapshot) {
    (**self).on_progress(snapshot);
  }

  fn on_finished(&self, report: &TransferReport) {
    (**self).on_finished(report);
  }
}
