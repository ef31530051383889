// LogTally - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::ParsePolicy;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for LogTally data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/logtally/ or %APPDATA%\LogTally\config\)
    pub config_dir: PathBuf,

    /// Data directory for the default record store.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Full path of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }

    /// Resolve a configured store path. Relative paths live under the data
    /// directory; an empty path selects the default store file there.
    pub fn store_path(&self, configured: &Path) -> PathBuf {
        if configured.as_os_str().is_empty() {
            self.data_dir.join(constants::STORE_FILE_NAME)
        } else if configured.is_relative() {
            self.data_dir.join(configured)
        } else {
            configured.to_path_buf()
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[analysis]` section.
    pub analysis: AnalysisSection,
    /// `[import]` section.
    pub import: ImportSection,
    /// `[storage]` section.
    pub storage: StorageSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[analysis]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Length of the top-errors list.
    pub top_errors: Option<usize>,
}

/// `[import]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ImportSection {
    /// Record a diagnostic for every rejected line.
    pub strict: Option<bool>,
}

/// `[storage]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Persistent record store path. Empty or absent = in-memory only.
    pub path: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Length of the top-errors list.
    pub top_errors: usize,
    /// Parse policy for imports.
    pub parse_policy: ParsePolicy,
    /// Persistent record store path, if any.
    pub store_path: Option<PathBuf>,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            top_errors: constants::DEFAULT_TOP_ERRORS,
            parse_policy: ParsePolicy::default(),
            store_path: None,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults plus a warning; the application still
/// starts.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    if !config_path.exists() {
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path.to_path_buf(),
                source: e,
            };
            return (AppConfig::default(), vec![format!("{err}. Using defaults.")]);
        }
    };

    parse_config(&content, config_path)
}

/// Validate the text of a config file. `config_path` is used in messages.
pub fn parse_config(content: &str, config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let raw: RawConfig = match toml::from_str(content) {
        Ok(r) => r,
        Err(e) => {
            let err = ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            };
            warnings.push(format!("{err}. Using defaults."));
            return (AppConfig::default(), warnings);
        }
    };

    let mut config = AppConfig::default();

    // -- Analysis: top_errors --
    if let Some(top) = raw.analysis.top_errors {
        if (constants::MIN_TOP_ERRORS..=constants::MAX_TOP_ERRORS).contains(&top) {
            config.top_errors = top;
        } else {
            let err = ConfigError::ValueOutOfRange {
                field: "[analysis] top_errors".to_string(),
                value: top.to_string(),
                expected: format!("{}-{}", constants::MIN_TOP_ERRORS, constants::MAX_TOP_ERRORS),
            };
            warnings.push(format!(
                "{err}. Using default ({}).",
                constants::DEFAULT_TOP_ERRORS
            ));
        }
    }

    // -- Import: strict --
    if let Some(true) = raw.import.strict {
        config.parse_policy = ParsePolicy::Strict;
    }

    // -- Storage: path --
    if let Some(ref path) = raw.storage.path {
        if !path.trim().is_empty() {
            config.store_path = Some(PathBuf::from(path.trim()));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(content: &str) -> (AppConfig, Vec<String>) {
        parse_config(content, Path::new("config.toml"))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"));
        assert!(warnings.is_empty());
        assert_eq!(config.top_errors, constants::DEFAULT_TOP_ERRORS);
        assert_eq!(config.parse_policy, ParsePolicy::Lenient);
        assert!(config.store_path.is_none());
    }

    #[test]
    fn test_valid_config_applied() {
        let (config, warnings) = parse(
            r#"
[analysis]
top_errors = 10

[import]
strict = true

[storage]
path = "/var/lib/logtally/records.jsonl"

[logging]
level = "DEBUG"
file = "logtally.log"
"#,
        );
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
        assert_eq!(config.top_errors, 10);
        assert_eq!(config.parse_policy, ParsePolicy::Strict);
        assert_eq!(
            config.store_path,
            Some(PathBuf::from("/var/lib/logtally/records.jsonl"))
        );
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_file.as_deref(), Some("logtally.log"));
    }

    #[test]
    fn test_out_of_range_top_errors_falls_back() {
        let (config, warnings) = parse("[analysis]\ntop_errors = 0\n");
        assert_eq!(config.top_errors, constants::DEFAULT_TOP_ERRORS);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("top_errors"));
    }

    #[test]
    fn test_unknown_log_level_warns() {
        let (config, warnings) = parse("[logging]\nlevel = \"loud\"\n");
        assert!(config.log_level.is_none());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_malformed_toml_falls_back_to_defaults() {
        let (config, warnings) = parse("[analysis\ntop_errors = ");
        assert_eq!(config.top_errors, constants::DEFAULT_TOP_ERRORS);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("Config parse error"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (config, warnings) = parse("[future]\nknob = 1\n[analysis]\ntop_errors = 3\n");
        assert!(warnings.is_empty());
        assert_eq!(config.top_errors, 3);
    }

    #[test]
    fn test_blank_store_path_means_memory() {
        let (config, _) = parse("[storage]\npath = \"  \"\n");
        assert!(config.store_path.is_none());
    }

    #[test]
    fn test_store_path_resolution() {
        let paths = PlatformPaths {
            config_dir: PathBuf::from("/cfg"),
            data_dir: PathBuf::from("/data"),
        };
        assert_eq!(
            paths.store_path(Path::new("")),
            PathBuf::from("/data").join(constants::STORE_FILE_NAME)
        );
        assert_eq!(
            paths.store_path(Path::new("mine.jsonl")),
            PathBuf::from("/data/mine.jsonl")
        );
        let absolute = std::env::temp_dir().join("records.jsonl");
        assert_eq!(paths.store_path(&absolute), absolute);
    }

    #[test]
    fn test_load_config_reads_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[analysis]\ntop_errors = 7\n").unwrap();
        let (config, warnings) = load_config(&path);
        assert!(warnings.is_empty());
        assert_eq!(config.top_errors, 7);
    }
}
