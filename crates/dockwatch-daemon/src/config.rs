//! Daemon configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Daemon configuration. Log filtering is driven by `RUST_LOG`, not the
/// config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Poll loop settings
    #[serde(default)]
    pub poll: PollConfig,
    /// Base station USB settings
    #[serde(default)]
    pub device: DeviceConfig,
    /// Headset audio node names
    #[serde(default)]
    pub audio: AudioConfig,
}

/// Poll loop settings. The poll interval doubles as the retry interval for
/// every transient failure, so it bounds worst-case recovery latency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Poll interval in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Consecutive confirming samples required before a headset state flip
    #[serde(default = "default_debounce_threshold")]
    pub debounce_threshold: u32,
    /// Consecutive unreadable polls before a degraded-mode warning
    #[serde(default = "default_degraded_after")]
    pub degraded_after_polls: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            debounce_threshold: default_debounce_threshold(),
            degraded_after_polls: default_degraded_after(),
        }
    }
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_debounce_threshold() -> u32 {
    2
}

fn default_degraded_after() -> u32 {
    30
}

/// Base station USB settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// USB Vendor ID (hex)
    #[serde(default = "default_vid")]
    pub vendor_id: String,
    /// USB Product ID (hex)
    #[serde(default = "default_pid")]
    pub product_id: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self { vendor_id: default_vid(), product_id: default_pid() }
    }
}

impl DeviceConfig {
    /// Parse the vendor ID hex string.
    ///
    /// # Errors
    /// Returns an error if the string is not valid hex.
    pub fn vendor_id(&self) -> Result<u16> {
        u16::from_str_radix(&self.vendor_id, 16)
            .with_context(|| format!("Invalid vendor_id: {}", self.vendor_id))
    }

    /// Parse the product ID hex string.
    ///
    /// # Errors
    /// Returns an error if the string is not valid hex.
    pub fn product_id(&self) -> Result<u16> {
        u16::from_str_radix(&self.product_id, 16)
            .with_context(|| format!("Invalid product_id: {}", self.product_id))
    }
}

fn default_vid() -> String {
    "9886".to_string()
}

fn default_pid() -> String {
    "002c".to_string()
}

/// Headset audio node names. Device-specific and stable across reboots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// A50 game sink node name
    #[serde(default = "default_headset_sink")]
    pub headset_sink: String,
    /// A50 chat source node name
    #[serde(default = "default_headset_source")]
    pub headset_source: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { headset_sink: default_headset_sink(), headset_source: default_headset_source() }
    }
}

fn default_headset_sink() -> String {
    "alsa_output.usb-Astro_Gaming_Astro_A50-00.stereo-game".to_string()
}

fn default_headset_source() -> String {
    "alsa_input.usb-Astro_Gaming_Astro_A50-00.mono-chat".to_string()
}

/// Load configuration from file or defaults.
pub fn load_config() -> Result<Config> {
    let config_path = config_path()?;

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {config_path:?}"))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {config_path:?}"))?;
        Ok(config)
    } else {
        info!(?config_path, "Config file not found, using defaults");
        Ok(Config::default())
    }
}

/// Get the configuration file path.
fn config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "dockwatch", "Dockwatch")
        .context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}
