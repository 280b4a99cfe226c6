use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use daisy_core::domain::{BookDescriptor, CancelSignal, FolderName, TransferOutcome, TransferPhase};
use daisy_core::errors::{CoreError, TransferError};
use daisy_core::ports::{ArchiveUnpacker, DeviceClient, DeviceError, ProgressListener, UnpackError, UnpackStats};
use daisy_core::services::{ConflictPolicy, ProgressSnapshot, TransferEngine, prepare_destination};
use tempfile::{TempDir, tempdir};

// -----------------------------------------------------------------------------
// Fakes
// -----------------------------------------------------------------------------

/// Writes a fixed tree instead of reading the archive.
struct FakeUnpacker {
  files: Vec<(&'static str, usize)>,
}

#[async_trait]
impl ArchiveUnpacker for FakeUnpacker {
  async fn unpack(&self, _archive: &Path, dest: &Path) -> Result<UnpackStats, UnpackError> {
    let mut stats = UnpackStats::default();
    for (rel, size) in &self.files {
      let path = dest.join(rel);
      if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| UnpackError::Io(e.to_string()))?;
      }
      std::fs::write(&path, vec![b'x'; *size]).map_err(|e| UnpackError::Io(e.to_string()))?;
      stats.entries += 1;
      stats.bytes += *size as u64;
    }
    Ok(stats)
  }
}

#[derive(Default)]
struct MockDevice {
  connected: bool,
  existing: Vec<String>,
  uploads: Mutex<Vec<String>>,
  created: Mutex<Vec<String>>,
  deleted: Mutex<Vec<String>>,
  /// 1-based index of the upload that fails.
  fail_on_upload: Option<usize>,
  /// 1-based index of the upload that finds the device gone.
  disconnect_on_upload: Option<usize>,
  /// Remote directory whose creation fails.
  fail_create: Option<&'static str>,
  /// Raise the signal once this many uploads went through.
  cancel_after: Option<(usize, CancelSignal)>,
}

impl MockDevice {
  fn connected() -> Self {
    Self { connected: true, ..Self::default() }
  }

  fn uploads(&self) -> Vec<String> {
    self.uploads.lock().unwrap().clone()
  }

  fn created(&self) -> Vec<String> {
    self.created.lock().unwrap().clone()
  }
}

#[async_trait]
impl DeviceClient for MockDevice {
  async fn connect(&mut self) -> Result<(), DeviceError> {
    self.connected = true;
    Ok(())
  }

  async fn disconnect(&mut self) -> Result<(), DeviceError> {
    self.connected = false;
    Ok(())
  }

  fn is_connected(&self) -> bool {
    self.connected
  }

  async fn list_directories(&self, _path: &str) -> Result<Vec<String>, DeviceError> {
    Ok(self.existing.clone())
  }

  async fn directory_exists(&self, path: &str) -> Result<bool, DeviceError> {
    Ok(self.created.lock().unwrap().iter().any(|p| p == path))
  }

  async fn create_directory(&self, path: &str) -> Result<(), DeviceError> {
    if self.fail_create == Some(path) {
      return Err(DeviceError::Io("read-only".into()));
    }
    self.created.lock().unwrap().push(path.to_string());
    Ok(())
  }

  async fn delete_directory(&self, path: &str, _recursive: bool) -> Result<(), DeviceError> {
    self.deleted.lock().unwrap().push(path.to_string());
    Ok(())
  }

  async fn upload_file(&self, _local: &Path, remote: &str) -> Result<(), DeviceError> {
    let mut uploads = self.uploads.lock().unwrap();
    if self.fail_on_upload == Some(uploads.len() + 1) {
      return Err(DeviceError::Io("write failed".into()));
    }
    if self.disconnect_on_upload == Some(uploads.len() + 1) {
      return Err(DeviceError::Disconnected);
    }
    uploads.push(remote.to_string());
    if let Some((after, signal)) = &self.cancel_after {
      if uploads.len() >= *after {
        signal.cancel();
      }
    }
    Ok(())
  }
}

#[derive(Default)]
struct RecordingListener {
  snapshots: Mutex<Vec<ProgressSnapshot>>,
}

impl ProgressListener for RecordingListener {
  fn on_progress(&self, snapshot: &ProgressSnapshot) {
    self.snapshots.lock().unwrap().push(snapshot.clone());
  }
}

struct Fixture {
  _dir: TempDir,
  archive: PathBuf,
  staging_root: PathBuf,
}

fn fixture() -> Fixture {
  let dir = tempdir().unwrap();
  let archive = dir.path().join("book1.zip");
  std::fs::write(&archive, b"PK").unwrap();
  let staging_root = dir.path().join("scratch");
  std::fs::create_dir(&staging_root).unwrap();
  Fixture { _dir: dir, archive, staging_root }
}

fn staging_is_empty(fx: &Fixture) -> bool {
  std::fs::read_dir(&fx.staging_root).unwrap().next().is_none()
}

fn engine(
  fx: &Fixture,
  files: Vec<(&'static str, usize)>,
) -> TransferEngine<FakeUnpacker, Arc<RecordingListener>> {
  TransferEngine::new(FakeUnpacker { files }, Arc::new(RecordingListener::default()), &fx.staging_root)
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[tokio::test]
async fn successful_transfer_counts_every_byte() {
  let fx = fixture();
  let engine = engine(&fx, vec![("a.mp3", 1000), ("b.mp3", 2000)]);
  let mut device = MockDevice::connected();
  let book = BookDescriptor::new(&fx.archive, "Voices", "A. Author");

  let report = engine.run(&mut device, &book, "/Books/Voices", &CancelSignal::new()).await;

  assert!(matches!(report.outcome, TransferOutcome::Completed), "{:?}", report.outcome);
  assert_eq!(report.total_bytes, 3000);
  assert_eq!(report.transferred_bytes, 3000);
  assert_eq!(report.files_uploaded, 2);
  assert_eq!(report.percent, 100);
  assert_eq!(device.uploads(), vec!["/Books/Voices/a.mp3", "/Books/Voices/b.mp3"]);
  assert!(staging_is_empty(&fx));
}

#[tokio::test]
async fn files_go_before_subdirectories() {
  let fx = fixture();
  let engine = engine(&fx, vec![("z.txt", 1), ("sub/a.mp3", 2), ("a/x.mp3", 3), ("a/deep/y.mp3", 4)]);
  let mut device = MockDevice::connected();

  let report = engine.run_archive(&mut device, &fx.archive, "/d", &CancelSignal::new()).await;

  assert!(report.outcome.is_success());
  assert_eq!(device.uploads(), vec!["/d/z.txt", "/d/a/x.mp3", "/d/a/deep/y.mp3", "/d/sub/a.mp3"]);
  assert_eq!(device.created(), vec!["/d", "/d/a", "/d/a/deep", "/d/sub"]);
}

#[tokio::test]
async fn cancellation_stops_further_uploads() {
  let fx = fixture();
  let engine = engine(&fx, vec![("1.mp3", 10), ("2.mp3", 10), ("3.mp3", 10), ("4.mp3", 10), ("5.mp3", 10)]);
  let cancel = CancelSignal::new();
  let mut device = MockDevice { cancel_after: Some((2, cancel.clone())), ..MockDevice::connected() };

  let report = engine.run_archive(&mut device, &fx.archive, "/d", &cancel).await;

  assert!(matches!(report.outcome, TransferOutcome::Cancelled));
  assert_eq!(device.uploads().len(), 2);
  assert_eq!(report.transferred_bytes, 20);
  assert!(report.percent < 100);
  assert!(staging_is_empty(&fx));
}

#[tokio::test]
async fn cancelled_before_start_touches_nothing() {
  let fx = fixture();
  let engine = engine(&fx, vec![("a.mp3", 1)]);
  let cancel = CancelSignal::new();
  cancel.cancel();
  let mut device = MockDevice::connected();

  let report = engine.run_archive(&mut device, &fx.archive, "/d", &cancel).await;

  assert!(matches!(report.outcome, TransferOutcome::Cancelled));
  assert!(device.created().is_empty());
  assert!(device.uploads().is_empty());
}

#[tokio::test]
async fn failing_upload_aborts_the_session() {
  let fx = fixture();
  let engine = engine(&fx, vec![("1.mp3", 5), ("2.mp3", 5), ("3.mp3", 5), ("4.mp3", 5)]);
  let mut device = MockDevice { fail_on_upload: Some(3), ..MockDevice::connected() };

  let report = engine.run_archive(&mut device, &fx.archive, "/d", &CancelSignal::new()).await;

  match &report.outcome {
    TransferOutcome::Failed(TransferError::Upload { local, remote, .. }) => {
      assert_eq!(remote, "/d/3.mp3");
      assert_eq!(local.file_name().unwrap(), "3.mp3");
    }
    other => panic!("unexpected outcome: {other:?}"),
  }
  assert_eq!(device.uploads(), vec!["/d/1.mp3", "/d/2.mp3"]);
  assert_eq!(report.transferred_bytes, 10);
  assert!(staging_is_empty(&fx));
}

#[tokio::test]
async fn failing_destination_creation_uploads_nothing() {
  let fx = fixture();
  let engine = engine(&fx, vec![("a.mp3", 1), ("sub/b.mp3", 2)]);
  let mut device = MockDevice { fail_create: Some("/d"), ..MockDevice::connected() };

  let report = engine.run_archive(&mut device, &fx.archive, "/d", &CancelSignal::new()).await;

  match &report.outcome {
    TransferOutcome::Failed(TransferError::DirectoryCreate { path, .. }) => assert_eq!(path, "/d"),
    other => panic!("unexpected outcome: {other:?}"),
  }
  assert!(device.uploads().is_empty());
  assert_eq!(report.transferred_bytes, 0);
  assert!(staging_is_empty(&fx));
}

#[tokio::test]
async fn failure_inside_a_subdirectory_skips_later_siblings() {
  let fx = fixture();
  let engine = engine(&fx, vec![("a/1.mp3", 1), ("a/2.mp3", 1), ("b/3.mp3", 1)]);
  let mut device = MockDevice { fail_on_upload: Some(2), ..MockDevice::connected() };

  let report = engine.run_archive(&mut device, &fx.archive, "/d", &CancelSignal::new()).await;

  match &report.outcome {
    TransferOutcome::Failed(TransferError::Upload { remote, .. }) => assert_eq!(remote, "/d/a/2.mp3"),
    other => panic!("unexpected outcome: {other:?}"),
  }
  assert_eq!(device.uploads(), vec!["/d/a/1.mp3"]);
  assert_eq!(device.created(), vec!["/d", "/d/a"]);
  assert!(staging_is_empty(&fx));
}

#[tokio::test]
async fn device_lost_mid_copy_is_reported_as_disconnected() {
  let fx = fixture();
  let engine = engine(&fx, vec![("1.mp3", 5), ("2.mp3", 5), ("3.mp3", 5)]);
  let mut device = MockDevice { disconnect_on_upload: Some(2), ..MockDevice::connected() };

  let report = engine.run_archive(&mut device, &fx.archive, "/d", &CancelSignal::new()).await;

  assert!(matches!(report.outcome, TransferOutcome::Failed(TransferError::DeviceDisconnected)));
  assert_eq!(device.uploads(), vec!["/d/1.mp3"]);
  assert_eq!(report.transferred_bytes, 5);
  assert!(staging_is_empty(&fx));
}

#[tokio::test]
async fn disconnected_device_fails_before_extraction() {
  let fx = fixture();
  let engine = engine(&fx, vec![("a.mp3", 1)]);
  let mut device = MockDevice::default();

  let report = engine.run_archive(&mut device, &fx.archive, "/d", &CancelSignal::new()).await;

  assert!(matches!(report.outcome, TransferOutcome::Failed(TransferError::DeviceDisconnected)));
  assert!(staging_is_empty(&fx));
}

#[tokio::test]
async fn missing_archive_is_an_extraction_error() {
  let fx = fixture();
  let engine = engine(&fx, vec![("a.mp3", 1)]);
  let mut device = MockDevice::connected();
  let missing = fx.archive.with_file_name("gone.zip");

  let report = engine.run_archive(&mut device, &missing, "/d", &CancelSignal::new()).await;

  assert!(matches!(report.outcome, TransferOutcome::Failed(TransferError::Extraction { .. })));
  assert!(device.created().is_empty());
  assert!(staging_is_empty(&fx));
}

#[tokio::test]
async fn listener_sees_phases_in_order() {
  let fx = fixture();
  let engine = engine(&fx, vec![("a.mp3", 1000), ("b.mp3", 2000)]);
  let mut device = MockDevice::connected();

  engine.run_archive(&mut device, &fx.archive, "/d", &CancelSignal::new()).await;

  let snapshots = engine.listener().snapshots.lock().unwrap().clone();
  let mut phases: Vec<TransferPhase> = snapshots.iter().map(|s| s.phase).collect();
  phases.dedup();
  assert_eq!(
    phases,
    vec![
      TransferPhase::Extracting,
      TransferPhase::SizingStaging,
      TransferPhase::CreatingDestination,
      TransferPhase::CopyingFiles,
      TransferPhase::Completed,
    ]
  );
  assert!(snapshots.iter().any(|s| s.label == "Copying (2/2): b.mp3"));
  assert_eq!(snapshots.last().unwrap().percent, 100);
}

#[tokio::test]
async fn existing_destination_is_refused_or_replaced() {
  let name = FolderName::from_title("Voices");
  let device = MockDevice { existing: vec!["/Books/Voices".into()], ..MockDevice::connected() };

  let err = prepare_destination(&device, "/Books", &name, ConflictPolicy::Fail).await.unwrap_err();
  assert!(matches!(err, CoreError::DestinationExists(path) if path == "/Books/Voices"));

  let path = prepare_destination(&device, "\\Books", &name, ConflictPolicy::Overwrite).await.unwrap();
  assert_eq!(path, "/Books/Voices");
  assert_eq!(device.deleted.lock().unwrap().clone(), vec!["/Books/Voices"]);
}

#[tokio::test]
async fn prepare_requires_a_connected_device() {
  let device = MockDevice::default();

  let err = prepare_destination(&device, "/Books", &FolderName::from_title("X"), ConflictPolicy::Fail)
    .await
    .unwrap_err();

  assert!(matches!(err, CoreError::DeviceDisconnected));
}
