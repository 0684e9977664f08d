//! TOML configuration for the bridge.
//!
//! Reads and writes `BridgeConfig` at the platform-appropriate path:
//! - Windows:  `%APPDATA%\ch9329-bridge\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/ch9329-bridge/config.toml` (or `~/.config/…`)
//! - macOS:    `~/Library/Application Support/ch9329-bridge/config.toml`
//!
//! Example:
//!
//! ```toml
//! [serial]
//! port = "/dev/ttyUSB0"
//! baud_rate = 9600
//!
//! [keyboard]
//! target_layout = "jis"
//!
//! [pacing]
//! frame_settle_ms = 20
//! char_gap_ms = 10
//!
//! [screen]
//! width = 1920
//! height = 1080
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every field has a `#[serde(default = "…")]` helper, so a missing file, a
//! missing section, or a missing key all fall back to the same defaults.

use std::path::{Path, PathBuf};

use ch9329_core::{ScreenSize, TargetLayout};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::sequencer::Pacing;
use crate::infrastructure::transport::DEFAULT_BAUD_RATE;

const APP_DIR: &str = "ch9329-bridge";
const CONFIG_FILE: &str = "config.toml";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BridgeConfig {
    #[serde(default)]
    pub serial: SerialConfig,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SerialConfig {
    /// Device path (`/dev/ttyUSB0`, `COM3`).
    #[serde(default = "default_port")]
    pub port: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KeyboardConfig {
    /// Layout the target machine is set to: `"us"` or `"jis"`.
    #[serde(default)]
    pub target_layout: TargetLayout,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PacingConfig {
    #[serde(default = "default_frame_settle_ms")]
    pub frame_settle_ms: u64,
    #[serde(default = "default_char_gap_ms")]
    pub char_gap_ms: u64,
}

/// Target screen size, used to scale absolute mouse positions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenConfig {
    #[serde(default = "default_screen_width")]
    pub width: u32,
    #[serde(default = "default_screen_height")]
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_port() -> String {
    #[cfg(target_os = "windows")]
    {
        "COM3".to_string()
    }
    #[cfg(not(target_os = "windows"))]
    {
        "/dev/ttyUSB0".to_string()
    }
}
fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}
fn default_frame_settle_ms() -> u64 {
    20
}
fn default_char_gap_ms() -> u64 {
    10
}
fn default_screen_width() -> u32 {
    1920
}
fn default_screen_height() -> u32 {
    1080
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            frame_settle_ms: default_frame_settle_ms(),
            char_gap_ms: default_char_gap_ms(),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: default_screen_width(),
            height: default_screen_height(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl PacingConfig {
    pub fn to_pacing(&self) -> Pacing {
        Pacing::from_millis(self.frame_settle_ms, self.char_gap_ms)
    }
}

impl ScreenConfig {
    pub fn to_screen_size(&self) -> ScreenSize {
        ScreenSize {
            width: self.width,
            height: self.height,
        }
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

/// Loads the config from the default path.  A missing file yields defaults.
pub fn load_config() -> Result<BridgeConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads the config from `path`.  A missing file yields defaults.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config_from(path: &Path) -> Result<BridgeConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BridgeConfig::default()),
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes `config` to the default path, creating the directory if needed.
pub fn save_config(config: &BridgeConfig) -> Result<(), ConfigError> {
    save_config_to(config, &config_file_path()?)
}

/// Writes `config` to `path`, creating parent directories if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config_to(config: &BridgeConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join(APP_DIR))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join(APP_DIR))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join(APP_DIR)
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("ch9329-bridge-test-{}-{name}", std::process::id()))
            .join(CONFIG_FILE)
    }

    #[test]
    fn test_default_config_values() {
        // Arrange / Act
        let cfg = BridgeConfig::default();

        // Assert
        assert_eq!(cfg.serial.baud_rate, 9600);
        assert_eq!(cfg.keyboard.target_layout, TargetLayout::Us);
        assert_eq!(cfg.pacing.frame_settle_ms, 20);
        assert_eq!(cfg.pacing.char_gap_ms, 10);
        assert_eq!(cfg.screen.width, 1920);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let cfg: BridgeConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, BridgeConfig::default());
    }

    #[test]
    fn test_partial_sections_override_only_given_keys() {
        // Arrange
        let toml_str = r#"
[serial]
baud_rate = 115200

[keyboard]
target_layout = "jis"

[pacing]
char_gap_ms = 0
"#;

        // Act
        let cfg: BridgeConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.serial.baud_rate, 115_200);
        assert_eq!(cfg.serial.port, default_port());
        assert_eq!(cfg.keyboard.target_layout, TargetLayout::Jis);
        assert_eq!(cfg.pacing.frame_settle_ms, 20);
        assert_eq!(cfg.pacing.char_gap_ms, 0);
    }

    #[test]
    fn test_unknown_layout_name_falls_back_to_us() {
        let cfg: BridgeConfig =
            toml::from_str("[keyboard]\ntarget_layout = \"azerty\"").expect("deserialize");
        assert_eq!(cfg.keyboard.target_layout, TargetLayout::Us);
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let result: Result<BridgeConfig, _> = toml::from_str("[serial\nport =");
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serializes_and_deserializes_round_trip() {
        let mut cfg = BridgeConfig::default();
        cfg.serial.port = "/dev/ttyACM1".to_string();
        cfg.keyboard.target_layout = TargetLayout::Jis;
        cfg.screen.height = 1440;

        let toml_str = toml::to_string_pretty(&cfg).expect("serialize");
        let restored: BridgeConfig = toml::from_str(&toml_str).expect("deserialize");

        assert_eq!(cfg, restored);
        assert!(toml_str.contains("target_layout = \"jis\""));
    }

    #[test]
    fn test_pacing_and_screen_conversions() {
        let cfg = BridgeConfig::default();
        let pacing = cfg.pacing.to_pacing();
        assert_eq!(pacing.frame_settle, Duration::from_millis(20));
        assert_eq!(pacing.char_gap, Duration::from_millis(10));
        assert_eq!(cfg.screen.to_screen_size(), ScreenSize::default());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = temp_path("missing");
        let cfg = load_config_from(&path).expect("missing file is not an error");
        assert_eq!(cfg, BridgeConfig::default());
    }

    #[test]
    fn test_save_then_load_from_disk() {
        // Arrange
        let path = temp_path("save-load");
        let mut cfg = BridgeConfig::default();
        cfg.pacing.frame_settle_ms = 5;

        // Act
        save_config_to(&cfg, &path).expect("save");
        let loaded = load_config_from(&path).expect("load");

        // Assert
        assert_eq!(loaded, cfg);
        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[test]
    fn test_config_file_path_ends_with_app_dir() {
        if let Ok(path) = config_file_path() {
            assert!(path.ends_with(Path::new(APP_DIR).join(CONFIG_FILE)));
        }
    }
}
