use daisy_core::ports::{DeviceClient, DeviceError};

/// Names of the folders directly below `path`, for picking a target folder.
pub async fn browse<D>(device: &D, path: &str) -> Result<Vec<String>, DeviceError>
where
  D: DeviceClient + ?Sized,
{
  let dirs = device.list_directories(path).await?;
  Ok(
    dirs
      .iter()
      .filter_map(|dir| dir.trim_end_matches('/').rsplit('/').next())
      .filter(|name| !name.is_empty())
      .map(str::to_string)
      .collect(),
  )
}
