use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow, bail};
use daisy_archive::ZipUnpacker;
use daisy_config::DaisyPaths;
use daisy_core::domain::{BookDescriptor, CancelSignal, CatalogEntry, TransferOutcome};
use daisy_core::ports::DeviceClient;
use daisy_core::services::{ArchiveScanner, ConflictPolicy, TransferEngine, prepare_destination};
use daisy_device::{DeviceSettings, LocalDevice};
use daisy_metadata::NccProbe;
use daisy_scanner::{FsScanner, ScannerConfig};
use tracing::{info, warn};

use crate::reporter::ConsoleReporter;

pub struct CopyArgs {
  pub index: usize,
  pub dir: Option<PathBuf>,
  pub device_root: Option<PathBuf>,
  pub target: Option<String>,
  pub overwrite: bool,
}

type BookScanner = ArchiveScanner<FsScanner, NccProbe>;

fn book_scanner(paths: &DaisyPaths, dir: Option<PathBuf>) -> anyhow::Result<(BookScanner, PathBuf)> {
  let cfg = ScannerConfig::load()?;
  let source = match dir {
    Some(dir) => dir,
    None => cfg.resolved_source_dir()?,
  };
  Ok((ArchiveScanner::new(FsScanner::new(cfg), NccProbe::new(&paths.scratch_dir)), source))
}

pub async fn scan(paths: &DaisyPaths, dir: Option<PathBuf>) -> anyhow::Result<()> {
  let (scanner, source) = book_scanner(paths, dir)?;
  info!(dir = %source.display(), "scanning");

  let result = scanner.catalog(&source).await;
  daisy_fs::clear_dir(&paths.scratch_dir);

  let mut number = 0;
  for entry in result? {
    match entry {
      CatalogEntry::Placeholder(text) => println!("{text}"),
      CatalogEntry::Book(book) => {
        number += 1;
        println!("{number:>3}. {book}");
      }
    }
  }
  Ok(())
}

fn pick(books: Vec<BookDescriptor>, index: usize) -> anyhow::Result<BookDescriptor> {
  let count = books.len();
  index
    .checked_sub(1)
    .and_then(|i| books.into_iter().nth(i))
    .ok_or_else(|| anyhow!("no book number {index}; the catalog has {count}"))
}

fn device_from(settings: &DeviceSettings, device_root: Option<PathBuf>) -> anyhow::Result<LocalDevice> {
  let root = device_root
    .or_else(|| settings.mount_root.clone())
    .context("no device mount point; pass --device-root or set one with `daisy target`")?;
  Ok(LocalDevice::new(settings.device_name.clone(), root))
}

pub async fn copy(paths: &DaisyPaths, args: CopyArgs) -> anyhow::Result<()> {
  let (scanner, source) = book_scanner(paths, args.dir)?;
  let books = scanner.scan(&source).await;
  daisy_fs::clear_dir(&paths.scratch_dir);
  let book = pick(books?, args.index)?;

  let settings = DeviceSettings::load()?;
  let target = args
    .target
    .or_else(|| settings.target_folder.clone())
    .context("no target folder; choose one with `daisy target`")?;

  let mut device = device_from(&settings, args.device_root)?;
  device.connect().await?;

  let policy = if args.overwrite { ConflictPolicy::Overwrite } else { ConflictPolicy::Fail };
  let destination = prepare_destination(&device, &target, book.folder_name(), policy).await?;

  let cancel = CancelSignal::new();
  let on_interrupt = cancel.clone();
  let interrupt = tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      warn!("interrupt received, stopping after the current file");
      on_interrupt.cancel();
    }
  });

  let engine = TransferEngine::new(ZipUnpacker::new(), ConsoleReporter::new(), &paths.scratch_dir);
  let report = engine.run(&mut device, &book, &destination, &cancel).await;

  interrupt.abort();
  device.disconnect().await?;
  daisy_fs::clear_dir(&paths.scratch_dir);

  match report.outcome {
    TransferOutcome::Completed => {
      println!("Copied \"{}\" to {} ({} files).", book.title(), report.destination, report.files_uploaded);
      Ok(())
    }
    TransferOutcome::Cancelled => {
      println!("Copy cancelled; {} was left partially written.", report.destination);
      Ok(())
    }
    TransferOutcome::Failed(err) => Err(err.into()),
  }
}

pub async fn browse(device_root: Option<PathBuf>, path: &str) -> anyhow::Result<()> {
  let settings = DeviceSettings::load()?;
  let mut device = device_from(&settings, device_root)?;
  device.connect().await?;

  let names = daisy_device::browse(&device, path).await?;
  device.disconnect().await?;

  if names.is_empty() {
    println!("No folders in {path}.");
  }
  for name in names {
    println!("{name}");
  }
  Ok(())
}

pub async fn set_target(
  folder: String,
  device_name: Option<String>,
  device_root: Option<PathBuf>,
) -> anyhow::Result<()> {
  let mut settings = DeviceSettings::load()?;
  if let Some(name) = device_name {
    settings.device_name = name;
  }
  if let Some(root) = device_root {
    settings.mount_root = Some(root);
  }

  if let Some(root) = settings.mount_root.clone() {
    check_folder(&settings, &root, &folder).await?;
  }

  settings.target_folder = Some(folder.replace('\\', "/"));
  settings.save()?;
  println!("Books will be copied into {folder}.");
  Ok(())
}

/// The folder must already exist on a reachable device.
async fn check_folder(settings: &DeviceSettings, root: &Path, folder: &str) -> anyhow::Result<()> {
  let mut device = LocalDevice::new(settings.device_name.clone(), root);
  device.connect().await?;
  let exists = device.directory_exists(folder).await?;
  device.disconnect().await?;

  if !exists {
    bail!("{folder} does not exist on {}", settings.device_name);
  }
  Ok(())
}
