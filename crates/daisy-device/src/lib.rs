pub mod browse;
pub mod config;
pub mod local;

pub use browse::browse;
pub use config::DeviceSettings;
pub use local::LocalDevice;
