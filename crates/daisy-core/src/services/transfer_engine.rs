use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::domain::{BookDescriptor, CancelSignal, TransferOutcome, TransferPhase, TransferReport};
use crate::errors::TransferError;
use crate::ports::{ArchiveUnpacker, DeviceClient, DeviceError, ProgressListener};
use crate::services::destination::remote_join;
use crate::services::progress::ProgressSnapshot;
use crate::services::session::{Halt, TransferSession};
use crate::services::staging::StagingDirectory;

/// A staged directory still waiting to be copied.
struct PendingDir {
  local: PathBuf,
  remote: String,
  /// The root was already created while entering `CreatingDestination`.
  is_root: bool,
}

/// Contents of one staged directory, sorted by name.
struct DirListing {
  files: Vec<(PathBuf, u64)>,
  dirs: Vec<PathBuf>,
}

/// Copies one book archive onto a device.
///
/// Each run extracts into its own staging directory under `staging_root`,
/// uploads the tree file by file and always deletes the staging directory.
pub struct TransferEngine<U, L>
where
  U: ArchiveUnpacker,
  L: ProgressListener,
{
  unpacker: U,
  listener: L,
  staging_root: PathBuf,
}

impl<U, L> TransferEngine<U, L>
where
  U: ArchiveUnpacker,
  L: ProgressListener,
{
  pub fn new(unpacker: U, listener: L, staging_root: impl Into<PathBuf>) -> Self {
    Self { unpacker, listener, staging_root: staging_root.into() }
  }

  pub fn listener(&self) -> &L {
    &self.listener
  }

  /// Copies `book` into `destination` on `device`.
  ///
  /// Never returns an error: every failure is reported in the outcome.
  pub async fn run<D>(
    &self,
    device: &mut D,
    book: &BookDescriptor,
    destination: &str,
    cancel: &CancelSignal,
  ) -> TransferReport
  where
    D: DeviceClient + ?Sized,
  {
    self.run_archive(device, book.archive_path(), destination, cancel).await
  }

  /// Same as [`run`](Self::run) for an archive without a descriptor.
  pub async fn run_archive<D>(
    &self,
    device: &mut D,
    archive: &Path,
    destination: &str,
    cancel: &CancelSignal,
  ) -> TransferReport
  where
    D: DeviceClient + ?Sized,
  {
    let mut session = TransferSession::new(archive, destination, cancel.clone());
    info!(archive = %archive.display(), destination, "transfer started");

    let outcome = match self.drive(device, &mut session).await {
      Ok(()) => TransferOutcome::Completed,
      Err(Halt::Cancelled) => TransferOutcome::Cancelled,
      Err(Halt::Failed(err)) => TransferOutcome::Failed(err),
    };

    if let Some(staging) = session.take_staging() {
      staging.remove().await;
    }

    let snapshot = session.progress_mut().finish(outcome.phase());
    self.listener.on_progress(&snapshot);

    match &outcome {
      TransferOutcome::Completed => info!(destination, "transfer completed"),
      TransferOutcome::Cancelled => info!(destination, "transfer cancelled"),
      TransferOutcome::Failed(err) => warn!(destination, error = %err, "transfer failed"),
    }

    let report = session.into_report(outcome);
    self.listener.on_finished(&report);
    report
  }

  async fn drive<D>(&self, device: &mut D, session: &mut TransferSession) -> Result<(), Halt>
  where
    D: DeviceClient + ?Sized,
  {
    if !device.is_connected() {
      return Err(TransferError::DeviceDisconnected.into());
    }
    session.checkpoint()?;

    self.enter(session, TransferPhase::Extracting);
    let staging_path = self.extract(session).await?;
    session.checkpoint()?;

    self.enter(session, TransferPhase::SizingStaging);
    let total = daisy_fs::dir_size(&staging_path)
      .await
      .map_err(|e| TransferError::Sizing { path: staging_path.clone(), reason: e.to_string() })?;
    session.progress_mut().set_total_bytes(total);
    debug!(total_bytes = total, "staging sized");
    session.checkpoint()?;

    self.enter(session, TransferPhase::CreatingDestination);
    let destination = session.destination().to_string();
    device.create_directory(&destination).await.map_err(|e| directory_error(&destination, e))?;
    session.checkpoint()?;

    self.enter(session, TransferPhase::CopyingFiles);
    self.copy_tree(device, session, staging_path, destination).await
  }

  async fn extract(&self, session: &mut TransferSession) -> Result<PathBuf, Halt> {
    let source = session.source().to_path_buf();
    let extraction = |reason: String| TransferError::Extraction { path: source.clone(), reason };

    let staging =
      StagingDirectory::create(&self.staging_root).await.map_err(|e| extraction(e.to_string()))?;
    let staging_path = staging.path().to_path_buf();
    session.attach_staging(staging);

    match tokio::fs::metadata(&source).await {
      Ok(meta) if meta.is_file() => {}
      Ok(_) => return Err(extraction("not a file".into()).into()),
      Err(e) => return Err(extraction(e.to_string()).into()),
    }

    let stats =
      self.unpacker.unpack(&source, &staging_path).await.map_err(|e| extraction(e.to_string()))?;
    debug!(entries = stats.entries, bytes = stats.bytes, "archive extracted");

    Ok(staging_path)
  }

  /// Depth-first copy. Files of a directory go before any of its
  /// subdirectories; siblings are visited in name order.
  async fn copy_tree<D>(
    &self,
    device: &mut D,
    session: &mut TransferSession,
    staging_root: PathBuf,
    destination: String,
  ) -> Result<(), Halt>
  where
    D: DeviceClient + ?Sized,
  {
    let mut pending = vec![PendingDir { local: staging_root, remote: destination, is_root: true }];

    while let Some(dir) = pending.pop() {
      if !dir.is_root {
        session.checkpoint()?;
        ensure_remote_dir(device, &dir.remote).await?;
      }

      let listing = list_sorted(&dir.local).await.map_err(|e| TransferError::Upload {
        local: dir.local.clone(),
        remote: dir.remote.clone(),
        reason: e.to_string(),
      })?;

      let total_in_dir = listing.files.len();
      for (index, (local, size)) in listing.files.iter().enumerate() {
        session.checkpoint()?;

        let name = file_name(local);
        let remote = remote_join(&dir.remote, &name);
        let snapshot = session.progress_mut().file_started(index + 1, total_in_dir, &name);
        self.emit(&snapshot);

        device.upload_file(local, &remote).await.map_err(|e| upload_error(local, &remote, e))?;
        debug!(file = %remote, bytes = size, "uploaded");

        if let Some(snapshot) = session.file_uploaded(*size) {
          self.emit(&snapshot);
        }
      }

      for sub in listing.dirs.into_iter().rev() {
        let remote = remote_join(&dir.remote, &file_name(&sub));
        pending.push(PendingDir { local: sub, remote, is_root: false });
      }
    }

    Ok(())
  }

  fn enter(&self, session: &mut TransferSession, phase: TransferPhase) {
    debug!(%phase, "entering phase");
    let snapshot = session.progress_mut().enter_phase(phase);
    self.emit(&snapshot);
  }

  fn emit(&self, snapshot: &ProgressSnapshot) {
    self.listener.on_progress(snapshot);
  }
}

async fn ensure_remote_dir<D>(device: &D, remote: &str) -> Result<(), TransferError>
where
  D: DeviceClient + ?Sized,
{
  let exists = device.directory_exists(remote).await.map_err(|e| directory_error(remote, e))?;
  if !exists {
    device.create_directory(remote).await.map_err(|e| directory_error(remote, e))?;
  }
  Ok(())
}

async fn list_sorted(dir: &Path) -> io::Result<DirListing> {
  let mut files = Vec::new();
  let mut dirs = Vec::new();

  let mut rd = tokio::fs::read_dir(dir).await?;
  while let Some(entry) = rd.next_entry().await? {
    let file_type = entry.file_type().await?;
    if file_type.is_dir() {
      dirs.push(entry.path());
    } else {
      let size = entry.metadata().await?.len();
      files.push((entry.path(), size));
    }
  }

  files.sort_by(|a, b| a.0.file_name().cmp(&b.0.file_name()));
  dirs.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
  Ok(DirListing { files, dirs })
}

fn file_name(path: &Path) -> String {
  path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

fn directory_error(remote: &str, err: DeviceError) -> TransferError {
  match err {
    DeviceError::Disconnected => TransferError::DeviceDisconnected,
    other => TransferError::DirectoryCreate { path: remote.to_string(), reason: other.to_string() },
  }
}

fn upload_error(local: &Path, remote: &str, err: DeviceError) -> TransferError {
  match err {
    DeviceError::Disconnected => TransferError::DeviceDisconnected,
    other => TransferError::Upload {
      local: local.to_path_buf(),
      remote: remote.to_string(),
      reason: other.to_string(),
    },
  }
}
