pub mod mapping;
pub mod ncc_probe;
pub mod tag_keys;

pub use ncc_probe::NccProbe;
