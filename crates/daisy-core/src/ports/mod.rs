pub mod archive;
pub mod device;
pub mod metadata;
pub mod progress;
pub mod scanner;

pub use archive::{ArchiveUnpacker, UnpackError, UnpackStats};
pub use device::{DeviceClient, DeviceError};
pub use metadata::{BookProbe, MetadataError, MetadataExtractor, NotABookReason};
pub use progress::ProgressListener;
pub use scanner::{FileScanner, ScanError, ScannedFile};
