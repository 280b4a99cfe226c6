use std::collections::HashSet;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use futures::stream::{self, Stream};
use tokio::fs::{self, ReadDir};

// =============================================================================
// File identity (platform specific)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(not(unix), allow(dead_code))]
struct FileId(u64, u64);

#[cfg(unix)]
fn file_id(meta: &std::fs::Metadata) -> Option<FileId> {
  use std::os::unix::fs::MetadataExt;
  Some(FileId(meta.dev(), meta.ino()))
}

/// No stable identity off Unix; such directories are never deduplicated.
#[cfg(not(unix))]
fn file_id(_meta: &std::fs::Metadata) -> Option<FileId> {
  None
}

// =============================================================================
// Options and entries
// =============================================================================

/// Controls how far and how the walker descends.
#[derive(Debug, Clone)]
pub struct WalkConfig {
  pub follow_symlinks: bool,
  /// Deepest directory level that is opened. `0` lists the root only.
  pub max_depth: usize,
  /// Remember visited directories so symlink loops terminate.
  pub dedup_dirs: bool,
}

impl WalkConfig {
  /// Lists the immediate children of the root without descending.
  pub fn shallow() -> Self {
    Self { follow_symlinks: false, max_depth: 0, dedup_dirs: false }
  }

  /// Descends the whole tree (bounded only by `usize::MAX`).
  pub fn recursive() -> Self {
    Self { follow_symlinks: false, max_depth: usize::MAX, dedup_dirs: true }
  }
}

impl Default for WalkConfig {
  fn default() -> Self {
    Self::recursive()
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filtering {
  /// Do not yield the entry, but still descend if it is a directory.
  Ignore,
  /// Do not yield the entry and never descend into it.
  IgnoreDir,
  /// Yield the entry.
  Continue,
}

#[derive(Debug)]
pub struct WalkEntry {
  pub path: PathBuf,
  pub depth: usize,
  /// Type as reported by `lstat`; a symlink stays a symlink.
  pub file_type: std::fs::FileType,
}

impl WalkEntry {
  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn is_file(&self) -> bool {
    self.file_type.is_file()
  }
}

// =============================================================================
// Walker state
// =============================================================================

enum Frame {
  /// A directory that still has to be opened.
  Pending { path: PathBuf, depth: usize, id_hint: Option<FileId> },
  /// A directory being iterated.
  Open { rd: ReadDir, depth: usize },
}

struct WalkState<F> {
  stack: Vec<Frame>,
  visited: HashSet<FileId>,
  cfg: WalkConfig,
  filter: F,
}

/// Streams every entry below `root` without filtering.
pub fn walk(root: impl Into<PathBuf>, cfg: WalkConfig) -> impl Stream<Item = io::Result<WalkEntry>> {
  walk_filtered(root, cfg, |_| async { Filtering::Continue })
}

/// Streams the entries below `root`, consulting `filter` for each one.
///
/// The traversal is an explicit stack of frames, so deep trees never grow the
/// call stack. Errors on single entries are yielded and the walk continues.
pub fn walk_filtered<F, Fut>(
  root: impl Into<PathBuf>,
  cfg: WalkConfig,
  filter: F,
) -> impl Stream<Item = io::Result<WalkEntry>>
where
  F: FnMut(&WalkEntry) -> Fut + Send + 'static,
  Fut: Future<Output = Filtering> + Send,
{
  let mut stack = Vec::with_capacity(16);
  stack.push(Frame::Pending { path: root.into(), depth: 0, id_hint: None });

  let state = WalkState { stack, visited: HashSet::new(), cfg, filter };

  stream::unfold(state, |mut st| async move {
    loop {
      let top = st.stack.last_mut()?;

      match top {
        Frame::Pending { path, depth, id_hint } => {
          let path = path.clone();
          let depth = *depth;
          let id_hint = *id_hint;
          st.stack.pop();

          if depth > st.cfg.max_depth {
            continue;
          }

          if st.cfg.dedup_dirs {
            let id = match id_hint {
              Some(id) => Some(id),
              None => match fs::metadata(&path).await {
                Ok(m) if m.is_dir() => file_id(&m),
                Ok(_) => None,
                Err(e) => return Some((Err(e), st)),
              },
            };

            if let Some(id) = id {
              if !st.visited.insert(id) {
                continue;
              }
            }
          }

          match fs::read_dir(&path).await {
            Ok(rd) => st.stack.push(Frame::Open { rd, depth }),
            Err(e) => return Some((Err(e), st)),
          }
        }

        Frame::Open { rd, depth } => {
          let depth = *depth;

          match rd.next_entry().await {
            Ok(Some(entry)) => {
              let path = entry.path();
              let file_type = match entry.file_type().await {
                Ok(ft) => ft,
                Err(e) => return Some((Err(e), st)),
              };

              let entry_depth = depth + 1;
              let walk_entry = WalkEntry { path: path.clone(), depth: entry_depth, file_type };
              let filtering = (st.filter)(&walk_entry).await;

              let descend = filtering != Filtering::IgnoreDir && entry_depth <= st.cfg.max_depth;
              if descend {
                if file_type.is_dir() {
                  st.stack.push(Frame::Pending { path, depth: entry_depth, id_hint: None });
                } else if file_type.is_symlink() && st.cfg.follow_symlinks {
                  if let Ok(m) = fs::metadata(&walk_entry.path).await {
                    if m.is_dir() {
                      let id_hint = if st.cfg.dedup_dirs { file_id(&m) } else { None };
                      st.stack.push(Frame::Pending { path, depth: entry_depth, id_hint });
                    }
                  }
                }
              }

              if filtering == Filtering::Continue {
                return Some((Ok(walk_entry), st));
              }
            }
            Ok(None) => {
              st.stack.pop();
            }
            Err(e) => {
              st.stack.pop();
              return Some((Err(e), st));
            }
          }
        }
      }
    }
  })
}
