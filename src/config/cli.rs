use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    Blocking,
    Reactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "user-fetch")]
#[command(about = "Fetch users from a remote JSON API")]
pub struct CliConfig {
    #[arg(long, env = "API_URL", default_value = "")]
    pub api_url: String,

    #[arg(long, help = "TOML file with an [api] section; overrides --api-url")]
    pub config: Option<String>,

    #[arg(long, default_value = "3", allow_negative_numbers = true)]
    pub limit: i32,

    #[arg(long, value_enum, default_value = "blocking")]
    pub mode: FetchMode,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

/// URL and limit the CLI will fetch with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub api_url: String,
    pub limit: i32,
}

impl CliConfig {
    /// `--config` wins over `--api-url`. A file without `limit` falls back to `--limit`.
    pub fn resolve_settings(&self) -> Result<FetchSettings> {
        match &self.config {
            Some(path) => {
                let file_config = TomlConfig::from_file(path)?;
                file_config.validate()?;
                Ok(FetchSettings {
                    api_url: file_config.api_url().to_string(),
                    limit: file_config.limit().unwrap_or(self.limit),
                })
            }
            None => {
                self.validate()?;
                Ok(FetchSettings {
                    api_url: self.api_url.clone(),
                    limit: self.limit,
                })
            }
        }
    }
}

impl ConfigProvider for CliConfig {
    fn api_url(&self) -> &str {
        &self.api_url
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("api_url", &self.api_url)
    }
}
