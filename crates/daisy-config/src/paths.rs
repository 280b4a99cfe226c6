use directories::{BaseDirs, ProjectDirs, UserDirs};
use std::path::PathBuf;
use thiserror::Error;

/// Environment variable that relocates every application directory under one root.
pub const BASE_DIR_ENV: &str = "DAISY_BASE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

#[derive(Debug, Clone)]
pub struct DaisyPaths {
  pub base_dir: PathBuf,
  pub config_dir: PathBuf,
  /// Private scratch root for probe and staging directories. Owned by the app.
  pub scratch_dir: PathBuf,
  /// Where downloaded book archives land, when the platform knows one.
  pub download_dir: Option<PathBuf>,
}

impl DaisyPaths {
  pub fn new() -> Result<Self, ConfigError> {
    let (base_dir, config_dir, scratch_dir);

    if let Ok(env_base) = std::env::var(BASE_DIR_ENV) {
      let base = PathBuf::from(env_base);
      config_dir = base.join("config");
      scratch_dir = base.join("scratch");
      base_dir = base;
    } else {
      let proj_dirs = ProjectDirs::from("org", "daisy", "daisy-transfer").ok_or(ConfigError::Directories)?;
      base_dir = proj_dirs.config_dir().to_path_buf();
      config_dir = proj_dirs.config_dir().to_path_buf();
      scratch_dir = std::env::temp_dir().join("daisy-transfer");
    }

    std::fs::create_dir_all(&config_dir)?;

    Ok(Self { base_dir, config_dir, scratch_dir, download_dir: detect_download_dir() })
  }

  pub fn detect() -> Result<Self, ConfigError> {
    Self::new()
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("daisy.toml")
  }
}

fn detect_download_dir() -> Option<PathBuf> {
  UserDirs::new()
    .and_then(|dirs| dirs.download_dir().map(|p| p.to_path_buf()))
    .or_else(|| BaseDirs::new().map(|dirs| dirs.home_dir().join("Downloads")))
}
