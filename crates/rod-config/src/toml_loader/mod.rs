//! TOML config file loading and path resolution.

mod loader;
mod paths;


pub use loader::{load_default, load_from_path};
pub use paths::default_config_path;
