use std::path::PathBuf;

use daisy_config::{ConfigBackend, ConfigError, TomlConfigBackend, config_backend, paths};
use serde::{Deserialize, Serialize};

const SECTION: &str = "scanner";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ScannerConfig {
  /// Directory holding downloaded books. When unset, the user's Downloads
  /// directory is used.
  #[serde(default)]
  pub source_dir: Option<PathBuf>,

  /// Archive extensions to consider, without the dot.
  #[serde(default = "default_archive_exts")]
  pub archive_exts: Vec<String>,

  /// Skip dot-files and dot-directories.
  #[serde(default = "default_ignore_hidden")]
  pub ignore_hidden: bool,

  /// How many directory levels below the source to descend. `0` keeps the
  /// scan to the source directory itself.
  #[serde(default)]
  pub max_depth: usize,
}

fn default_archive_exts() -> Vec<String> {
  vec!["zip".into()]
}

fn default_ignore_hidden() -> bool {
  true
}

impl Default for ScannerConfig {
  fn default() -> Self {
    ScannerConfig {
      source_dir: None,
      archive_exts: default_archive_exts(),
      ignore_hidden: default_ignore_hidden(),
      max_depth: 0,
    }
  }
}

impl ScannerConfig {
  /// Loads the section, writing the defaults back so the file is discoverable.
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(config_backend()?)
  }

  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    let cfg: Self = backend.load_section_with_default(SECTION)?;
    backend.save_section(SECTION, &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    config_backend()?.save_section(SECTION, self)
  }

  /// The configured source directory, falling back to the user's Downloads.
  pub fn resolved_source_dir(&self) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = &self.source_dir {
      return Ok(dir.clone());
    }

    paths()?
      .download_dir
      .clone()
      .ok_or_else(|| ConfigError::Other("no source directory configured and no Downloads directory found".into()))
  }
}
