use std::fs::File;
use std::io::Write;
use std::path::Path;

use daisy_archive::ZipUnpacker;
use daisy_core::domain::{CancelSignal, TransferOutcome};
use daisy_core::errors::CoreError;
use daisy_core::ports::DeviceClient;
use daisy_core::services::{ArchiveScanner, ConflictPolicy, TransferEngine, prepare_destination};
use daisy_device::LocalDevice;
use daisy_metadata::NccProbe;
use daisy_scanner::{FsScanner, ScannerConfig};
use tempfile::tempdir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const NCC: &str = r#"<html><head>
<meta name="dc:title" content="Voices">
<meta name="dc:creator" content="A. Author">
</head><body></body></html>"#;

fn write_book(path: &Path) {
  write_book_with_ncc(path, NCC);
}

fn write_book_with_ncc(path: &Path, ncc: &str) {
  let mut writer = ZipWriter::new(File::create(path).unwrap());
  let options = SimpleFileOptions::default();
  writer.start_file("ncc.html", options).unwrap();
  writer.write_all(ncc.as_bytes()).unwrap();
  writer.start_file("a.mp3", options).unwrap();
  writer.write_all(&[1u8; 1000]).unwrap();
  writer.start_file("audio/b.mp3", options).unwrap();
  writer.write_all(&[2u8; 2000]).unwrap();
  writer.finish().unwrap();
}

fn scanner_config() -> ScannerConfig {
  ScannerConfig { source_dir: None, archive_exts: vec!["zip".into()], ignore_hidden: true, max_depth: 0 }
}

#[tokio::test]
async fn scanned_book_lands_on_the_device() {
  let tmp = tempdir().unwrap();
  let downloads = tmp.path().join("downloads");
  let scratch = tmp.path().join("scratch");
  let mount = tmp.path().join("mount");
  for dir in [&downloads, &scratch, &mount] {
    std::fs::create_dir_all(dir).unwrap();
  }
  std::fs::create_dir_all(mount.join("Books")).unwrap();
  write_book(&downloads.join("book1.zip"));
  std::fs::write(downloads.join("readme.txt"), b"not an archive").unwrap();

  let scanner = ArchiveScanner::new(FsScanner::new(scanner_config()), NccProbe::new(&scratch));
  let books = scanner.scan(&downloads).await.unwrap();
  assert_eq!(books.len(), 1);
  let book = &books[0];
  assert_eq!((book.title(), book.author()), ("Voices", "A. Author"));

  let mut device = LocalDevice::new("Stream", &mount);
  device.connect().await.unwrap();
  let destination =
    prepare_destination(&device, "/Books", book.folder_name(), ConflictPolicy::Fail).await.unwrap();
  assert_eq!(destination, "/Books/Voices");

  let engine = TransferEngine::new(ZipUnpacker::new(), (), &scratch);
  let report = engine.run(&mut device, book, &destination, &CancelSignal::new()).await;

  assert!(matches!(report.outcome, TransferOutcome::Completed), "{:?}", report.outcome);
  let ncc_len = NCC.len() as u64;
  assert_eq!(report.total_bytes, 3000 + ncc_len);
  assert_eq!(report.transferred_bytes, report.total_bytes);
  assert_eq!(report.percent, 100);
  assert_eq!(std::fs::metadata(mount.join("Books/Voices/a.mp3")).unwrap().len(), 1000);
  assert_eq!(std::fs::metadata(mount.join("Books/Voices/audio/b.mp3")).unwrap().len(), 2000);
  assert!(std::fs::read_dir(&scratch).unwrap().next().is_none(), "scratch not cleaned");

  let err = prepare_destination(&device, "/Books", book.folder_name(), ConflictPolicy::Fail).await.unwrap_err();
  assert!(matches!(err, CoreError::DestinationExists(_)));

  let again =
    prepare_destination(&device, "/Books", book.folder_name(), ConflictPolicy::Overwrite).await.unwrap();
  assert_eq!(again, destination);
  assert!(!mount.join("Books/Voices").exists());
}

#[tokio::test]
async fn dot_title_gets_its_own_folder() {
  let tmp = tempdir().unwrap();
  let downloads = tmp.path().join("downloads");
  let scratch = tmp.path().join("scratch");
  let mount = tmp.path().join("mount");
  for dir in [&downloads, &scratch, &mount.join("Books")] {
    std::fs::create_dir_all(dir).unwrap();
  }
  let ncc = r#"<meta name="dc:title" content="."><meta name="dc:creator" content="Nobody">"#;
  write_book_with_ncc(&downloads.join("dot.zip"), ncc);

  let scanner = ArchiveScanner::new(FsScanner::new(scanner_config()), NccProbe::new(&scratch));
  let books = scanner.scan(&downloads).await.unwrap();
  assert_eq!(books[0].title(), ".");

  let mut device = LocalDevice::new("Stream", &mount);
  device.connect().await.unwrap();
  let destination =
    prepare_destination(&device, "/Books", books[0].folder_name(), ConflictPolicy::Fail).await.unwrap();
  assert_eq!(destination, "/Books/book");

  let engine = TransferEngine::new(ZipUnpacker::new(), (), &scratch);
  let report = engine.run(&mut device, &books[0], &destination, &CancelSignal::new()).await;

  assert!(matches!(report.outcome, TransferOutcome::Completed), "{:?}", report.outcome);
  assert!(mount.join("Books/book/a.mp3").exists());
  assert!(!mount.join("Books/a.mp3").exists());
}
