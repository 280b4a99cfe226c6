use daisy_core::domain::{TransferOutcome, TransferReport};
use daisy_core::ports::ProgressListener;
use daisy_core::services::ProgressSnapshot;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{msg}\n[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos:>3}%";

/// Draws transfer progress as a terminal bar.
pub struct ConsoleReporter {
  bar: ProgressBar,
}

impl ConsoleReporter {
  pub fn new() -> Self {
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::with_template(TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style.progress_chars("#>-"));
    Self { bar }
  }
}

impl ProgressListener for ConsoleReporter {
  fn on_progress(&self, snapshot: &ProgressSnapshot) {
    self.bar.set_position(u64::from(snapshot.percent));
    self.bar.set_message(snapshot.label.clone());
  }

  fn on_finished(&self, report: &TransferReport) {
    match &report.outcome {
      TransferOutcome::Completed => self.bar.finish_with_message("Copy complete."),
      TransferOutcome::Cancelled => self.bar.abandon_with_message("Copy cancelled."),
      TransferOutcome::Failed(_) => self.bar.abandon_with_message("Copy failed."),
    }
  }
}
