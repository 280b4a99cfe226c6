pub mod async_walker;
pub mod io;
pub mod scratch;
pub mod size;

pub use io::atomic_write_str;
pub use scratch::{clear_dir, recreate_dir};
pub use size::dir_size;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
  #[error("io error at {}: {source}", path.display())]
  Io { path: std::path::PathBuf, source: std::io::Error },

  #[error("walker error: {0}")]
  Walker(String),
}
