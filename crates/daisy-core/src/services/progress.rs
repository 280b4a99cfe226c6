use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::TransferPhase;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Lower bound and upper cap of the file-count band.
const FILE_BAND_BASE: u64 = 15;
const FILE_BAND_CAP: u64 = 80;
const FILE_BAND_SPAN: u64 = FILE_BAND_CAP - FILE_BAND_BASE;

/// Highest percentage reachable before the session completes.
const BYTE_BAND_CAP: u64 = 99;

/// What the user sees at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
  pub phase: TransferPhase,
  pub percent: u8,
  pub label: String,
  pub transferred_bytes: u64,
  pub total_bytes: u64,
}

/// Turns file and byte counters into one coarse percentage plus a label.
///
/// Two formulas feed the same value: a per-directory file count while a file
/// starts, and the global byte ratio once it is uploaded. The value can move
/// backwards when a new directory level starts; that is accepted.
#[derive(Debug)]
pub struct ProgressAggregator {
  phase: TransferPhase,
  percent: u8,
  total_bytes: u64,
  transferred: Arc<AtomicU64>,
}

impl ProgressAggregator {
  pub fn new(transferred: Arc<AtomicU64>) -> Self {
    Self { phase: TransferPhase::Idle, percent: 0, total_bytes: 0, transferred }
  }

  pub fn set_total_bytes(&mut self, total: u64) {
    self.total_bytes = total;
  }

  pub fn total_bytes(&self) -> u64 {
    self.total_bytes
  }

  pub fn transferred_bytes(&self) -> u64 {
    self.transferred.load(Ordering::SeqCst)
  }

  pub fn percent(&self) -> u8 {
    self.percent
  }

  pub fn phase(&self) -> TransferPhase {
    self.phase
  }

  /// Enters `phase`, resetting the percentage to the phase base.
  pub fn enter_phase(&mut self, phase: TransferPhase) -> ProgressSnapshot {
    self.phase = phase;
    if let Some(base) = phase_base(phase) {
      self.percent = base;
    }
    self.snapshot(phase.to_string())
  }

  /// A file is about to be uploaded. `number` is 1-based within its directory.
  pub fn file_started(&mut self, number: usize, total_in_dir: usize, name: &str) -> ProgressSnapshot {
    self.percent = file_band_percent(number, total_in_dir);
    self.snapshot(format!("Copying ({number}/{total_in_dir}): {name}"))
  }

  /// Adds the size of a finished upload to the shared counter.
  ///
  /// The byte band replaces the file band only when the total is known.
  pub fn file_uploaded(&mut self, bytes: u64) -> Option<ProgressSnapshot> {
    let transferred = self.transferred.fetch_add(bytes, Ordering::SeqCst) + bytes;
    if self.total_bytes == 0 {
      return None;
    }

    let raw = byte_ratio_percent(transferred, self.total_bytes);
    self.percent = raw.min(BYTE_BAND_CAP) as u8;

    let label = format!(
      "Copied: {:.1} MB / {:.1} MB ({raw}%)",
      transferred as f64 / BYTES_PER_MB,
      self.total_bytes as f64 / BYTES_PER_MB,
    );
    Some(self.snapshot(label))
  }

  /// Terminal state. Only a completed session reaches 100.
  pub fn finish(&mut self, phase: TransferPhase) -> ProgressSnapshot {
    self.phase = phase;
    if phase == TransferPhase::Completed {
      self.percent = 100;
    }
    self.snapshot(phase.to_string())
  }

  fn snapshot(&self, label: String) -> ProgressSnapshot {
    ProgressSnapshot {
      phase: self.phase,
      percent: self.percent,
      label,
      transferred_bytes: self.transferred_bytes(),
      total_bytes: self.total_bytes,
    }
  }
}

fn phase_base(phase: TransferPhase) -> Option<u8> {
  match phase {
    TransferPhase::Extracting => Some(0),
    TransferPhase::SizingStaging => Some(5),
    TransferPhase::CreatingDestination => Some(10),
    TransferPhase::CopyingFiles => Some(15),
    _ => None,
  }
}

fn file_band_percent(number: usize, total_in_dir: usize) -> u8 {
  let total = total_in_dir.max(1) as u64;
  let pct = FILE_BAND_BASE + (number as u64 * FILE_BAND_SPAN) / total;
  pct.min(FILE_BAND_CAP) as u8
}

fn byte_ratio_percent(transferred: u64, total: u64) -> u64 {
  ((transferred as u128 * 100) / total as u128) as u64
}
