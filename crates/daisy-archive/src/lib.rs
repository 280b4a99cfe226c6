mod book_archive;
mod unpacker;

pub use book_archive::{ArchiveError, BookArchive};
pub use unpacker::{ZipUnpacker, map_archive_error};
