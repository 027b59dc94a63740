//! Service configuration loaded from TOML.

#[path = "config/error.rs"]
mod error;

#[path = "config/load.rs"]
mod load;

#[path = "config/types.rs"]
mod types;

pub use error::ConfigError;
pub use load::{load_config, LoadedConfig, DEFAULT_CONFIG_FILE};
pub use types::{
    AppConfig, BackoffConfig, FetchConfig, LoggingConfig, RequestConfig, ServerConfig,
};
