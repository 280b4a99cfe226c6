pub mod book;
pub mod cancel;
pub mod transfer;

pub use book::{BookDescriptor, CatalogEntry, FOLDER_NAME_MAX_CHARS, FolderName};
pub use cancel::CancelSignal;
pub use transfer::{TransferOutcome, TransferPhase, TransferReport};
