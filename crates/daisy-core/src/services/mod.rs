pub mod archive_scanner;
pub mod destination;
pub mod progress;
pub mod session;
pub mod staging;
pub mod transfer_engine;

pub use archive_scanner::{ArchiveScanner, NO_ARCHIVES_TEXT, NO_BOOKS_TEXT};
pub use destination::{ConflictPolicy, prepare_destination, remote_join};
pub use progress::{ProgressAggregator, ProgressSnapshot};
pub use session::TransferSession;
pub use staging::StagingDirectory;
pub use transfer_engine::TransferEngine;
