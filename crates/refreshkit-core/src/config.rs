use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::geometry::{EdgeInsets, Size};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Refresh controller configuration, supplied by the owning screen
///
/// All lengths are in view points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Enable pull-to-refresh on the header
    #[serde(default = "default_true")]
    pub header_refresh_enabled: bool,
    /// Enable automatic loading of older items near the bottom
    #[serde(default = "default_true")]
    pub footer_refresh_enabled: bool,
    /// Height of the header indicator view
    #[serde(default = "default_indicator_height")]
    pub header_height: f64,
    /// Height of the footer indicator view
    #[serde(default = "default_indicator_height")]
    pub footer_height: f64,
    /// Pull ratio at or above which releasing the drag commits a refresh
    #[serde(default = "default_trigger_ratio")]
    pub trigger_ratio: f64,
    /// Extra distance past the top inset before the header shows
    #[serde(default = "default_hide_margin")]
    pub hide_margin: f64,
    /// Resting content insets of the scrollable view
    #[serde(default)]
    pub base_insets: EdgeInsets,
    /// Duration of the inset transitions around a refresh (0 = immediate)
    #[serde(default = "default_inset_animation_ms")]
    pub inset_animation_ms: u64,
    /// How far a manual refresh scrolls past the top
    #[serde(default = "default_manual_pull_offset")]
    pub manual_pull_offset: f64,
    /// Delay between the manual refresh scroll and the commit
    #[serde(default = "default_manual_refresh_delay_ms")]
    pub manual_refresh_delay_ms: u64,
    /// Release a backward load that has not completed after this long (0 = never)
    #[serde(default)]
    pub load_timeout_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            header_refresh_enabled: default_true(),
            footer_refresh_enabled: default_true(),
            header_height: default_indicator_height(),
            footer_height: default_indicator_height(),
            trigger_ratio: default_trigger_ratio(),
            hide_margin: default_hide_margin(),
            base_insets: EdgeInsets::default(),
            inset_animation_ms: default_inset_animation_ms(),
            manual_pull_offset: default_manual_pull_offset(),
            manual_refresh_delay_ms: default_manual_refresh_delay_ms(),
            load_timeout_ms: 0,
        }
    }
}

impl RefreshConfig {
    /// Reject geometry the evaluators cannot work with
    pub fn validate(&self) -> crate::Result<()> {
        if !(self.header_height > 0.0) {
            return Err(crate::Error::Config(format!(
                "header_height must be positive, got {}",
                self.header_height
            )));
        }
        if !(self.footer_height > 0.0) {
            return Err(crate::Error::Config(format!(
                "footer_height must be positive, got {}",
                self.footer_height
            )));
        }
        if !(self.trigger_ratio > 0.0) {
            return Err(crate::Error::Config(format!(
                "trigger_ratio must be positive, got {}",
                self.trigger_ratio
            )));
        }
        if self.hide_margin < 0.0 || self.hide_margin.is_nan() {
            return Err(crate::Error::Config(format!(
                "hide_margin must not be negative, got {}",
                self.hide_margin
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn inset_animation(&self) -> Duration {
        Duration::from_millis(self.inset_animation_ms)
    }

    #[inline]
    pub fn manual_refresh_delay(&self) -> Duration {
        Duration::from_millis(self.manual_refresh_delay_ms)
    }

    /// Watchdog timeout, if enabled
    #[inline]
    pub fn load_timeout(&self) -> Option<Duration> {
        (self.load_timeout_ms > 0).then(|| Duration::from_millis(self.load_timeout_ms))
    }

    /// Size the host layout should reserve for the header view
    pub fn header_size(&self) -> Size {
        Size::new(0.0, self.header_height)
    }

    /// Size the host layout should reserve for the footer view
    pub fn footer_size(&self) -> Size {
        Size::new(0.0, self.footer_height)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Tick rate in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// View points per terminal row
    #[serde(default = "default_units_per_row")]
    pub units_per_row: f64,
    /// Simulated latency of the demo data source
    #[serde(default = "default_demo_latency")]
    pub demo_latency_ms: u64,
    /// Items produced per demo load
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Make every n-th demo load fail (0 = never)
    #[serde(default)]
    pub demo_fail_every: u32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            units_per_row: default_units_per_row(),
            demo_latency_ms: default_demo_latency(),
            page_size: default_page_size(),
            demo_fail_every: 0,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("refreshkit")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_indicator_height() -> f64 {
    40.0
}

fn default_trigger_ratio() -> f64 {
    1.0
}

fn default_hide_margin() -> f64 {
    10.0 // hides the header slightly before the list comes to rest
}

fn default_inset_animation_ms() -> u64 {
    250
}

fn default_manual_pull_offset() -> f64 {
    100.0
}

fn default_manual_refresh_delay_ms() -> u64 {
    2000
}

fn default_tick_rate() -> u64 {
    50
}

fn default_units_per_row() -> f64 {
    10.0
}

fn default_demo_latency() -> u64 {
    1200
}

fn default_page_size() -> usize {
    20
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.refresh.validate()?;
        Ok(config)
    }

    /// Render configuration as TOML
    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/refreshkit/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("refreshkit")
            .join("config.toml")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }

    /// Get the log file used while the terminal UI owns the screen
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("refreshkit.log")
    }
}
