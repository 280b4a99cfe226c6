use crate::paths::{ConfigError, DaisyPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use toml_edit::{DocumentMut, Item};

pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

/// Sectioned TOML file. Writes go through `toml_edit` so hand-written comments survive.
#[derive(Debug, Clone)]
pub struct TomlConfigBackend {
  path: PathBuf,
}

impl TomlConfigBackend {
  pub fn new(path: PathBuf) -> Self {
    Self { path }
  }

  pub fn from_paths(paths: &DaisyPaths) -> Self {
    Self::new(paths.config_file())
  }

  pub fn path(&self) -> &std::path::Path {
    &self.path
  }

  /// Like `load_section`, but a missing file or section yields `T::default()`.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    let content = match fs::read_to_string(&self.path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
      Err(e) => return Err(e.into()),
    };

    let toml_val: toml::Value = toml::from_str(&content)?;
    let Some(table) = toml_val.get(section) else {
      return Ok(T::default());
    };

    decode_section(section, table)
  }
}

fn decode_section<T: DeserializeOwned>(section: &str, table: &toml::Value) -> Result<T, ConfigError> {
  table.clone().try_into().map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let content = fs::read_to_string(&self.path)?;
    let toml_val: toml::Value = toml::from_str(&content)?;

    let table = toml_val
      .get(section)
      .ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {}", self.path.display())))?;

    decode_section(section, table)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let mut doc: DocumentMut = match fs::read_to_string(&self.path) {
      Ok(content) => {
        content.parse::<DocumentMut>().map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?
      }
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // `toml::to_string` yields a header-less "key = value" body for the section.
    let section_str =
      toml::to_string(value).map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    let section_doc = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?;
    let section_item = Item::Table(section_doc.as_table().clone());

    doc[section] = section_item;

    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }
    daisy_fs::atomic_write_str(&self.path, &doc.to_string())?;

    Ok(())
  }
}
