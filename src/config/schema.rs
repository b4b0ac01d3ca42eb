use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Color palette selection for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Detect from the terminal background
    #[default]
    Auto,
    Dark,
    Light,
}

/// Main configuration, read from `~/.config/lead-desk/config.yaml`.
///
/// Every field is optional.
///
/// Example YAML:
/// ```yaml
/// data_path: /home/me/Dropbox/leads.json
/// sample_on_empty: false
/// theme: light
/// default_priority: hot
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Where the lead collection is stored (default: <data dir>/lead-desk/leads.json)
    #[serde(default)]
    pub data_path: Option<PathBuf>,

    /// Seed an empty collection with sample leads on startup
    #[serde(default = "default_sample_on_empty")]
    pub sample_on_empty: bool,

    #[serde(default)]
    pub theme: ThemeMode,

    /// Status filter applied when none is given ("all" or a status)
    #[serde(default)]
    pub default_status: Option<String>,

    /// Priority filter applied when none is given ("all", "hot", "warm", "cold")
    #[serde(default)]
    pub default_priority: Option<String>,
}

fn default_sample_on_empty() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            sample_on_empty: default_sample_on_empty(),
            theme: ThemeMode::Auto,
            default_status: None,
            default_priority: None,
        }
    }
}
