use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::api::constants::{DEFAULT_API_VERSION, MAX_RECORDS_PER_REQUEST};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiSettings,
    pub load: LoadSettings,
    pub users: UserDefaults,
    pub scheduling: SchedulingDefaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    pub version: String,
    /// Log in through the sandbox login host
    pub sandbox: bool,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            version: DEFAULT_API_VERSION.to_string(),
            sandbox: true,
            timeout_secs: 60,
            max_retries: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadSettings {
    pub batch_size: usize,
    pub log_file: PathBuf,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            batch_size: 100,
            log_file: PathBuf::from("result.log"),
        }
    }
}

/// Fixed fields of every created user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserDefaults {
    pub time_zone: String,
    pub locale: String,
    pub email_encoding: String,
    pub language: String,
}

impl Default for UserDefaults {
    fn default() -> Self {
        Self {
            time_zone: "America/New_York".to_string(),
            locale: "en_US".to_string(),
            email_encoding: "UTF-8".to_string(),
            language: "en_US".to_string(),
        }
    }
}

/// Names and values of the scheduling records, which have no sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulingDefaults {
    pub operating_hours_name: String,
    pub time_zone: String,
    pub work_type_name: String,
    pub estimated_duration: f64,
    pub duration_type: String,
    pub service_territory_name: String,
    pub country: String,
    pub work_type_group_name: String,
    pub group_type: String,
}

impl Default for SchedulingDefaults {
    fn default() -> Self {
        Self {
            operating_hours_name: "test hours".to_string(),
            time_zone: "America/New_York".to_string(),
            work_type_name: "test work type".to_string(),
            estimated_duration: 20.0,
            duration_type: "Hours".to_string(),
            service_territory_name: "test service territory".to_string(),
            country: "United States".to_string(),
            work_type_group_name: "test work type group".to_string(),
            group_type: "Default".to_string(),
        }
    }
}

/// Where a loaded `Config` came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// No file at this default location
    Defaults(PathBuf),
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Defaults(path) => write!(f, "defaults (no file at {})", path.display()),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("salesforce-seed");
        Ok(config_dir.join("config.toml"))
    }

    /// Load from `path`, or from the default location when `path` is `None`.
    /// A missing default file yields the defaults; a missing explicit file is
    /// an error.
    ///
    /// Runs before the logger exists, so it reports where the values came
    /// from instead of logging.
    pub fn load(path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = Self::get_config_path()?;
                if !default_path.exists() {
                    return Ok((Self::default(), ConfigSource::Defaults(default_path)));
                }
                default_path
            }
        };

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Invalid config file: {:?}", config_path))?;

        Ok((config, ConfigSource::File(config_path)))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_RECORDS_PER_REQUEST).contains(&self.load.batch_size) {
            anyhow::bail!(
                "load.batch_size must be between 1 and {}, got {}",
                MAX_RECORDS_PER_REQUEST,
                self.load.batch_size
            );
        }

        for (key, zone) in [
            ("users.time_zone", &self.users.time_zone),
            ("scheduling.time_zone", &self.scheduling.time_zone),
        ] {
            zone.parse::<Tz>()
                .map_err(|_| anyhow::anyhow!("{} is not a known time zone: {}", key, zone))?;
        }

        if self.api.version.trim().is_empty() {
            anyhow::bail!("api.version must not be empty");
        }

        Ok(())
    }
}
