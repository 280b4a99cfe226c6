pub mod adapter;
pub mod config;
pub mod fs_scanner;

pub use adapter::FsScanner;
pub use config::ScannerConfig;
pub use fs_scanner::{ScannerError, scan_archives};
