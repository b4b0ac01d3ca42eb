mod schema;

pub use schema::{Config, ThemeMode};

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::leads::{LeadQuery, PriorityFilter, StatusFilter};

/// Get the config directory path (~/.config/lead-desk/)
pub fn get_config_dir() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".config").join("lead-desk")
}

/// Get the default config file path (~/.config/lead-desk/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/lead-desk/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
///
/// A missing file at the default path is not an error; defaults apply.
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let explicit = path.is_some();
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        if explicit {
            anyhow::bail!("Config file not found at {}", config_path.display());
        }
        return Ok(Config::default());
    }

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!("Failed to parse config: invalid YAML in {}", config_path.display())
    })?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref status) = config.default_status {
        if let Err(e) = status.parse::<StatusFilter>() {
            errors.push(format!("default_status: {}", e));
        }
    }

    if let Some(ref priority) = config.default_priority {
        if let Err(e) = priority.parse::<PriorityFilter>() {
            errors.push(format!("default_priority: {}", e));
        }
    }

    if let Some(ref data_path) = config.data_path {
        if data_path.as_os_str().is_empty() {
            errors.push("data_path: must not be empty".to_string());
        } else if data_path.is_dir() {
            errors.push(format!(
                "data_path: {} is a directory, expected a file path",
                data_path.display()
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

impl Config {
    /// Where the lead collection lives
    pub fn leads_path(&self) -> PathBuf {
        self.data_path
            .clone()
            .unwrap_or_else(crate::leads::get_leads_path)
    }

    /// Starting query built from the configured default filters.
    /// Invalid values fall back to `all`; `validate_config` reports them.
    pub fn default_query(&self) -> LeadQuery {
        LeadQuery {
            search: String::new(),
            status: self
                .default_status
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            priority: self
                .default_priority
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        }
    }
}
