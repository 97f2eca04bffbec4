//! TOML configuration for the hwdash binary

use crate::error::{HwdashError, Result};
use dirs::config_dir;
use serde::Deserialize;
use std::{collections::HashMap, fs, path::Path, path::PathBuf, time::Duration};
use tracing::debug;

const SYSTEM_CONFIG_PATH: &str = "/usr/share/hwdash/config.toml";

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub cache: CacheConfig,
    pub display: DisplayConfig,
    pub colors: HashMap<String, String>,
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct GeneralConfig {
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Filesystem root the provider reads `/proc` and `/sys` from
    pub root: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            root: "/".to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_secs: 300 }
    }
}

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct DisplayConfig {
    pub items: Vec<ConfigEntry>,
    pub separator: Option<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            items: default_items(),
            separator: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    #[serde(default)]
    pub key: String,
    /// `default` shows a summary field, `text` prints `value` verbatim
    #[serde(rename = "type", default = "default_entry_type")]
    pub r#type: String,
    pub value: String,
    pub color: Option<String>,
    pub value_color: Option<String>,
}

fn default_entry_type() -> String {
    "default".to_string()
}

fn field(key: &str, value: &str) -> ConfigEntry {
    ConfigEntry {
        key: key.to_string(),
        r#type: default_entry_type(),
        value: value.to_string(),
        color: None,
        value_color: None,
    }
}

fn text(value: &str) -> ConfigEntry {
    ConfigEntry {
        key: String::new(),
        r#type: "text".to_string(),
        value: value.to_string(),
        color: None,
        value_color: None,
    }
}

fn default_items() -> Vec<ConfigEntry> {
    vec![
        text("Hardware"),
        field("Manufacturer", "manufacturer"),
        field("Motherboard", "motherboard"),
        field("Model", "model"),
        field("CPU", "cpu"),
        field("RAM", "ram"),
        field("GPU", "gpu"),
        field("Drives", "hdd"),
        field("Network", "network"),
        field("Audio", "audio"),
        field("Display", "display"),
        text(""),
        text("System"),
        field("Computer", "computer_name"),
        field("OS", "os"),
        field("Version", "version"),
        field("Installed", "install_time"),
        field("Uptime", "boot_time"),
    ]
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::de::from_str(content)?)
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }

    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.general.root).into_owned())
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("hwdash/config.toml"))
}

/// Load the explicit path if given, else the user config, else the system
/// config, else built-in defaults.
pub fn load_config(explicit: Option<&str>) -> Result<Config> {
    if let Some(path) = explicit {
        let path = PathBuf::from(shellexpand::tilde(path).into_owned());
        if !path.exists() {
            return Err(HwdashError::Config(format!("{} does not exist", path.display())));
        }
        return load_from(&path);
    }

    let candidates = user_config_path()
        .into_iter()
        .chain(std::iter::once(PathBuf::from(SYSTEM_CONFIG_PATH)));
    for path in candidates {
        if path.exists() {
            return load_from(&path);
        }
    }

    debug!("no config file found, using defaults");
    Ok(Config::default())
}

fn load_from(path: &Path) -> Result<Config> {
    debug!("loading config from {}", path.display());
    let content = fs::read_to_string(path)?;
    Config::parse(&content)
        .map_err(|err| HwdashError::Config(format!("{}: {}", path.display(), err)))
}
