//! Configuration and palette management for retrohtml.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.retrohtml/config.toml`
//! - Built-in 16-colour palettes for the generated stylesheet
//!
//! # Configuration File
//!
//! ```toml
//! # Palette: vga, xterm, tango, solarized
//! palette = "vga"
//!
//! # Wrap output in a complete HTML document
//! document = true
//! title = "My art"
//!
//! # Write logs here instead of stderr (optional)
//! log_file = "/tmp/retrohtml.log"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the home directory")]
    NoHome,

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Main configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Palette name
    pub palette: String,
    /// Wrap output in a complete document
    pub document: bool,
    /// Document title
    pub title: Option<String>,
    /// Log file path
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            palette: "vga".to_string(),
            document: false,
            title: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self, ConfigError> {
        match Self::get_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`. A missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let Ok(content) = fs::read_to_string(path) else {
            return Ok(Self::default());
        };
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::get_config_path().ok_or(ConfigError::NoHome)?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save configuration to `path`, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        fs::write(path, content).map_err(write_err)
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".retrohtml").join("config.toml"))
    }

    /// Get the palette
    pub fn get_palette(&self) -> Palette {
        Palette::by_name(&self.palette)
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex notation
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// The 16 terminal colours in ANSI order: black, red, green, yellow, blue,
/// magenta, cyan, white, then the bright variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub name: &'static str,
    pub colors: [Rgb; 16],
}

impl Default for Palette {
    fn default() -> Self {
        Self::vga()
    }
}

impl Palette {
    /// IBM VGA text mode
    pub fn vga() -> Self {
        Self {
            name: "vga",
            colors: [
                Rgb::new(0, 0, 0),
                Rgb::new(170, 0, 0),
                Rgb::new(0, 170, 0),
                Rgb::new(170, 85, 0),
                Rgb::new(0, 0, 170),
                Rgb::new(170, 0, 170),
                Rgb::new(0, 170, 170),
                Rgb::new(170, 170, 170),
                Rgb::new(85, 85, 85),
                Rgb::new(255, 85, 85),
                Rgb::new(85, 255, 85),
                Rgb::new(255, 255, 85),
                Rgb::new(85, 85, 255),
                Rgb::new(255, 85, 255),
                Rgb::new(85, 255, 255),
                Rgb::new(255, 255, 255),
            ],
        }
    }

    /// xterm defaults
    pub fn xterm() -> Self {
        Self {
            name: "xterm",
            colors: [
                Rgb::new(0, 0, 0),
                Rgb::new(205, 0, 0),
                Rgb::new(0, 205, 0),
                Rgb::new(205, 205, 0),
                Rgb::new(0, 0, 238),
                Rgb::new(205, 0, 205),
                Rgb::new(0, 205, 205),
                Rgb::new(229, 229, 229),
                Rgb::new(127, 127, 127),
                Rgb::new(255, 0, 0),
                Rgb::new(0, 255, 0),
                Rgb::new(255, 255, 0),
                Rgb::new(92, 92, 255),
                Rgb::new(255, 0, 255),
                Rgb::new(0, 255, 255),
                Rgb::new(255, 255, 255),
            ],
        }
    }

    /// Tango desktop project
    pub fn tango() -> Self {
        Self {
            name: "tango",
            colors: [
                Rgb::new(46, 52, 54),
                Rgb::new(204, 0, 0),
                Rgb::new(78, 154, 6),
                Rgb::new(196, 160, 0),
                Rgb::new(52, 101, 164),
                Rgb::new(117, 80, 123),
                Rgb::new(6, 152, 154),
                Rgb::new(211, 215, 207),
                Rgb::new(85, 87, 83),
                Rgb::new(239, 41, 41),
                Rgb::new(138, 226, 52),
                Rgb::new(252, 233, 79),
                Rgb::new(114, 159, 207),
                Rgb::new(173, 127, 168),
                Rgb::new(52, 226, 226),
                Rgb::new(238, 238, 236),
            ],
        }
    }

    /// Ethan Schoonover's Solarized
    pub fn solarized() -> Self {
        Self {
            name: "solarized",
            colors: [
                Rgb::new(7, 54, 66),
                Rgb::new(220, 50, 47),
                Rgb::new(133, 153, 0),
                Rgb::new(181, 137, 0),
                Rgb::new(38, 139, 210),
                Rgb::new(211, 54, 130),
                Rgb::new(42, 161, 152),
                Rgb::new(238, 232, 213),
                Rgb::new(0, 43, 54),
                Rgb::new(203, 75, 22),
                Rgb::new(88, 110, 117),
                Rgb::new(101, 123, 131),
                Rgb::new(131, 148, 150),
                Rgb::new(108, 113, 196),
                Rgb::new(147, 161, 161),
                Rgb::new(253, 246, 227),
            ],
        }
    }

    /// Get palette by name, unknown names give the VGA palette
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "xterm" => Self::xterm(),
            "tango" => Self::tango(),
            "solarized" | "solarized-dark" => Self::solarized(),
            "vga" | "dos" | "cga" => Self::vga(),
            other => {
                warn!(palette = other, "unknown palette, using vga");
                Self::vga()
            }
        }
    }

    /// List available palettes
    pub fn list() -> Vec<&'static str> {
        vec!["vga", "xterm", "tango", "solarized"]
    }
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.palette, "vga");
        assert!(!config.document);
        assert_eq!(config.get_palette().name, "vga");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "document = true\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert!(config.document);
        assert_eq!(config.palette, "vga");
        assert_eq!(config.title, None);
    }

    #[test]
    fn test_broken_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "palette = [").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.toml"));
        assert_eq!(
            Config::load_from(&dir.path().join("missing.toml")).unwrap(),
            Config::default()
        );
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            palette: "tango".to_string(),
            document: true,
            title: Some("Art pack".to_string()),
            log_file: None,
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_palettes() {
        for name in Palette::list() {
            assert_eq!(Palette::by_name(name).name, name);
        }
        assert_eq!(Palette::by_name("nope"), Palette::vga());
        assert_eq!(Palette::vga().colors[3].hex(), "#aa5500");
    }
}
