//! Configuration loading and output folder resolution
//!
//! Bootstrap configuration comes from a TOML file. Every setting has a
//! compiled default, so a missing config file is never fatal. A config file
//! that exists but cannot be parsed is.
//!
//! # Settings Sources Priority
//!
//! 1. Command-line arguments (`-o`, `-c`)
//! 2. Environment variables (`JUDSON_OUTPUT`, `JUDSON_CONFIG`)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "JUDSON_CONFIG";

/// Environment variable naming the output (library) folder
pub const OUTPUT_ENV_VAR: &str = "JUDSON_OUTPUT";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Output folder for sorted files (optional)
    ///
    /// If not specified, sorted files land in `library_dir` under the source folder
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Name of the default output folder created under the source folder
    #[serde(default = "default_library_dir")]
    pub library_dir: String,

    /// Tag key fragment that marks a file as fingerprinted
    ///
    /// Matched case-insensitively as a substring of any tag key, with `_`
    /// and `-` treated as spaces, so `acoustid id` matches `TXXX:Acoustid Id`
    /// and `ACOUSTID_ID` but not `Acoustid Fingerprint`.
    #[serde(default = "default_fingerprint_tag")]
    pub fingerprint_tag: String,

    /// Tag namespaces in lookup priority order
    #[serde(default = "default_namespaces")]
    pub namespaces: Vec<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// File this configuration was read from, if any
    #[serde(skip)]
    pub loaded_from: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_library_dir() -> String {
    "library".to_string()
}

fn default_fingerprint_tag() -> String {
    "acoustid id".to_string()
}

fn default_namespaces() -> Vec<String> {
    [
        "id3v2",
        "id3v1",
        "vorbiscomments",
        "ape",
        "mp4",
        "riffinfo",
        "aifftext",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            output: None,
            library_dir: default_library_dir(),
            fingerprint_tag: default_fingerprint_tag(),
            namespaces: default_namespaces(),
            logging: LoggingConfig::default(),
            loaded_from: None,
        }
    }
}

impl TomlConfig {
    /// Parse and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Read {} failed: {}", path.display(), e))
        })?;
        let mut config: TomlConfig = toml::from_str(&content)?;
        config.validate()?;
        config.loaded_from = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load configuration
    ///
    /// An explicit path (argument, then `JUDSON_CONFIG`) must exist. Without
    /// one, the platform config file is used when present and compiled
    /// defaults otherwise. Nothing is logged here: tracing is configured from
    /// the result, so callers report [`loaded_from`](Self::loaded_from).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let explicit = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            return Self::from_file(&path);
        }

        match default_config_path() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Reject settings the sorter cannot work with
    pub fn validate(&self) -> Result<()> {
        let library_dir = self.library_dir.trim();
        if library_dir.is_empty() || library_dir.contains(['/', '\\']) {
            return Err(Error::Config(format!(
                "library_dir must be a single folder name, got '{}'",
                self.library_dir
            )));
        }

        if self.fingerprint_tag.trim().is_empty() {
            return Err(Error::Config("fingerprint_tag must not be empty".to_string()));
        }

        if self.namespaces.is_empty() {
            return Err(Error::Config("namespaces must list at least one tag namespace".to_string()));
        }

        Ok(())
    }
}

/// Get the platform config file path, if one exists
///
/// Tries `<config_dir>/judson/config.toml` first, then `/etc/judson/config.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("judson").join("config.toml"));
    if let Some(path) = user_config {
        if path.is_file() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/judson/config.toml");
        if system_config.is_file() {
            return Some(system_config);
        }
    }

    None
}

/// Resolve the output folder for sorted files
///
/// Priority: command-line argument, `JUDSON_OUTPUT`, TOML `output`,
/// then `library_dir` under the source folder.
pub fn resolve_output_folder(cli_arg: Option<&Path>, config: &TomlConfig, source: &Path) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        debug!("Output folder from command line: {}", path.display());
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Some(path) = std::env::var_os(OUTPUT_ENV_VAR).filter(|p| !p.is_empty()) {
        let path = PathBuf::from(path);
        debug!("Output folder from {}: {}", OUTPUT_ENV_VAR, path.display());
        return path;
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.output {
        debug!("Output folder from config file: {}", path.display());
        return path.clone();
    }

    // Priority 4: default folder under the source
    let path = source.join(&config.library_dir);
    debug!("Output folder defaulted to {}", path.display());
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.library_dir, "library");
        assert_eq!(config.fingerprint_tag, "acoustid id");
        assert!(config.loaded_from.is_none());
        assert_eq!(config.namespaces.first().map(String::as_str), Some("id3v2"));
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: TomlConfig = toml::from_str("fingerprint_tag = \"musicbrainz\"").unwrap();
        assert_eq!(config.fingerprint_tag, "musicbrainz");
        assert_eq!(config.library_dir, "library");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_nested_library_dir() {
        let config = TomlConfig {
            library_dir: "a/b".to_string(),
            ..TomlConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_empty_namespaces() {
        let config = TomlConfig {
            namespaces: Vec::new(),
            ..TomlConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
