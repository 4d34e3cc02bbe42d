pub mod data;
pub mod defaults;
pub mod migrate;
pub mod store;

pub use data::{Config, CustomTheme, Orientation, PageSize};
pub use store::{default_config_path, ConfigError, SettingsStore};
