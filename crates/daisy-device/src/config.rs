use std::path::PathBuf;

use daisy_config::{ConfigBackend, ConfigError, TomlConfigBackend, config_backend};
use serde::{Deserialize, Serialize};

const SECTION: &str = "device";

/// Name recorded when the user never picked one.
pub const DEFAULT_DEVICE_NAME: &str = "Stream V3";

/// Where books are copied to, remembered between runs.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DeviceSettings {
  #[serde(default = "default_device_name")]
  pub device_name: String,

  /// Remote folder the book folders are created in. Unset until chosen.
  #[serde(default)]
  pub target_folder: Option<String>,

  /// Local mount point of a mass-storage player.
  #[serde(default)]
  pub mount_root: Option<PathBuf>,
}

fn default_device_name() -> String {
  DEFAULT_DEVICE_NAME.to_string()
}

impl Default for DeviceSettings {
  fn default() -> Self {
    Self { device_name: default_device_name(), target_folder: None, mount_root: None }
  }
}

impl DeviceSettings {
  pub fn load() -> Result<Self, ConfigError> {
    Self::load_from(config_backend()?)
  }

  pub fn load_from(backend: &TomlConfigBackend) -> Result<Self, ConfigError> {
    backend.load_section_with_default(SECTION)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    self.save_to(config_backend()?)
  }

  pub fn save_to(&self, backend: &TomlConfigBackend) -> Result<(), ConfigError> {
    backend.save_section(SECTION, self)
  }
}
