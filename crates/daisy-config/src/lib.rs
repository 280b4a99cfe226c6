mod backend;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use paths::{BASE_DIR_ENV, ConfigError, DaisyPaths};

use once_cell::sync::OnceCell;

static PATHS: OnceCell<DaisyPaths> = OnceCell::new();
static CONFIG_BACKEND: OnceCell<TomlConfigBackend> = OnceCell::new();

/// Process-wide paths, resolved on first use.
pub fn paths() -> Result<&'static DaisyPaths, ConfigError> {
  PATHS.get_or_try_init(DaisyPaths::detect)
}

/// Process-wide config backend bound to `paths().config_file()`.
pub fn config_backend() -> Result<&'static TomlConfigBackend, ConfigError> {
  CONFIG_BACKEND.get_or_try_init(|| paths().map(TomlConfigBackend::from_paths))
}
