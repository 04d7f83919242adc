use serde::Deserialize;
use std::path::{Path, PathBuf};
use crate::error::{ReportError, Result};
use crate::storage::{Backend, Locator};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub dsn: Option<String>,
    pub username: Option<String>,
    #[serde(skip)]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

impl Settings {
    /// Load settings from a YAML file, or the defaults when no file is given
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let Some(config_path) = config_path else {
            return Ok(Settings::default());
        };

        if !config_path.exists() {
            return Err(ReportError::Config(format!(
                "Configuration file not found: {}\n\nCreate the file or drop --config.\nYou can use config.yaml.example as a template.",
                config_path.display()
            )));
        }

        let config_content = std::fs::read_to_string(config_path)
            .map_err(|e| ReportError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            )))?;

        Self::from_yaml(&config_content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Settings::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Validate the resolved configuration. Credentials are never defaulted.
    pub fn validate(&self) -> Result<()> {
        let dsn = self.database.dsn.as_deref().ok_or_else(|| {
            ReportError::Validation(
                "Database DSN is required (use --dsn, INCIDENT_DB_DSN or database.dsn)".to_string(),
            )
        })?;

        let locator = Locator::parse(dsn)?;

        if locator.backend() == Backend::Postgres {
            if is_blank(&self.database.username) {
                return Err(ReportError::Validation(
                    "Database username is required (use --username or INCIDENT_DB_USERNAME)".to_string(),
                ));
            }

            if is_blank(&self.database.password) {
                return Err(ReportError::Validation(
                    "Database password is required (use --password or INCIDENT_DB_PASSWORD)".to_string(),
                ));
            }
        }

        if self.output.directory.as_os_str().is_empty() {
            return Err(ReportError::Validation(
                "output.directory cannot be empty".to_string(),
            ));
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ReportError::Validation(format!(
                "logging.format must be one of {}, got '{}'",
                LOG_FORMATS.join(", "),
                self.logging.format
            )));
        }

        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}
