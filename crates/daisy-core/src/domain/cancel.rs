use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared, one-way cancellation flag.
///
/// Cloning hands out another handle to the same flag. The transfer engine only
/// polls it between steps, so an upload already in flight runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<AtomicBool>);

impl CancelSignal {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.0.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }
}
