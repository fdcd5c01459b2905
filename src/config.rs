// Configuration loading and parsing (config/analysis.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// analysis.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire analysis.toml file.
#[derive(Debug, Clone, Deserialize)]
struct AnalysisFile {
    analysis: AnalysisSettings,
    data: DataSection,
}

/// Tunable analysis policy.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    /// Minimum relative gap (fraction of our own total) for an opponent
    /// category to count as exploitable.
    pub exploit_threshold: f64,
    /// Stat ids whose roster total is the mean of player averages rather
    /// than their sum (FG%/FT%-style rate categories). League-specific.
    pub percentage_stat_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DataSection {
    snapshot: String,
}

/// The assembled runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub analysis: AnalysisSettings,
    pub snapshot_path: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/analysis.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy
/// defaults. Prefer `load_config()` which handles default initialization
/// automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("analysis.toml");
    let text = read_file(&path)?;
    let file: AnalysisFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        analysis: file.analysis,
        snapshot_path: file.data.snapshot,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure `config/analysis.toml` exists by copying it from `defaults/` on
/// first run. Returns the list of files that were copied.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working
/// directory, copying default config files first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let threshold = config.analysis.exploit_threshold;
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(ConfigError::ValidationError {
            field: "analysis.exploit_threshold".into(),
            message: "must be a fraction in (0.0, 1.0]".into(),
        });
    }

    if config
        .analysis
        .percentage_stat_ids
        .iter()
        .any(|id| id.trim().is_empty())
    {
        return Err(ConfigError::ValidationError {
            field: "analysis.percentage_stat_ids".into(),
            message: "stat ids must be non-empty".into(),
        });
    }

    if config.snapshot_path.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: "data.snapshot".into(),
            message: "snapshot path must be set".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        let file: AnalysisFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("inline"),
            source: e,
        })?;
        let config = Config {
            analysis: file.analysis,
            snapshot_path: file.data.snapshot,
        };
        validate(&config)?;
        Ok(config)
    }

    const GOOD: &str = r#"
        [analysis]
        exploit_threshold = 0.10
        percentage_stat_ids = ["5", "8"]

        [data]
        snapshot = "data/demo-snapshot.json"
    "#;

    #[test]
    fn parses_well_formed_config() {
        let config = parse(GOOD).unwrap();
        assert!((config.analysis.exploit_threshold - 0.10).abs() < 1e-12);
        assert_eq!(config.analysis.percentage_stat_ids, vec!["5", "8"]);
        assert_eq!(config.snapshot_path, "data/demo-snapshot.json");
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let text = GOOD.replace("0.10", "1.5");
        assert!(matches!(
            parse(&text),
            Err(ConfigError::ValidationError { .. })
        ));

        let text = GOOD.replace("0.10", "0.0");
        assert!(matches!(
            parse(&text),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn rejects_blank_percentage_id() {
        let text = GOOD.replace("\"5\", \"8\"", "\"5\", \"\"");
        assert!(matches!(
            parse(&text),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[test]
    fn rejects_missing_section() {
        assert!(matches!(
            parse("[analysis]\nexploit_threshold = 0.1\npercentage_stat_ids = []"),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn empty_percentage_set_is_allowed() {
        let text = GOOD.replace("[\"5\", \"8\"]", "[]");
        let config = parse(&text).unwrap();
        assert!(config.analysis.percentage_stat_ids.is_empty());
    }
}
