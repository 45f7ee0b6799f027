pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, FetchMode, FetchSettings};

pub use crate::config::toml_config::TomlConfig;
pub use crate::core::{adapter::UserFetchAdapter, ConfigProvider, User, UserApi, UserData, UserStream};
pub use crate::utils::error::{ErrorCategory, FetchError, Result};
