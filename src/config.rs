//! Configuration for tcreview.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (TCREVIEW_HOME, TCREVIEW_LEDGER)
//! 2. Config file (.tcreview/config.yaml)
//! 3. Defaults (~/.tcreview)
//!
//! Config file discovery:
//! - Searches current directory and parents for .tcreview/config.yaml
//! - Paths in config file are relative to the .tcreview/ directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::{SegmenterConfig, DEFAULT_PREVIEW_CHARS};

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Default ledger file name inside the home directory
pub const LEDGER_FILE_NAME: &str = "tc_reviews.json";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub segmentation: Option<SegmenterConfig>,
    #[serde(default)]
    pub review: Option<ReviewConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .tcreview/)
    pub home: Option<String>,
    /// Ledger file (relative to .tcreview/)
    pub ledger: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewConfig {
    pub preview_chars: Option<usize>,
    pub wrap_width: Option<usize>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory
    pub home: PathBuf,
    /// Ledger file
    pub ledger: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    /// Segmentation thresholds
    pub segmentation: SegmenterConfig,
    /// Presentation and record settings
    pub review: ReviewSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSettings {
    pub preview_chars: usize,
    pub wrap_width: usize,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
            wrap_width: 80,
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".tcreview").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to `base`
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Merge a parsed config file (if any) with environment overrides
fn resolve(
    config_file: Option<(PathBuf, ConfigFile)>,
    env_home: Option<String>,
    env_ledger: Option<String>,
) -> Result<ResolvedConfig> {
    let default_home = || -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .context("Failed to determine home directory")?
            .join(".tcreview"))
    };

    let (config_path, file) = match config_file {
        Some((path, file)) => (Some(path), Some(file)),
        None => (None, None),
    };

    // Paths in the file are relative to the .tcreview/ directory
    let base_dir = config_path
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf);

    let paths = file.as_ref().map(|f| &f.paths);
    let relative = |raw: &String| resolve_path(base_dir.as_deref().unwrap_or(Path::new(".")), raw);

    let home = match env_home {
        Some(home) => PathBuf::from(home),
        None => match paths.and_then(|p| p.home.as_ref()) {
            Some(raw) => relative(raw),
            None => default_home()?,
        },
    };

    let ledger = env_ledger
        .map(PathBuf::from)
        .or_else(|| paths.and_then(|p| p.ledger.as_ref()).map(relative))
        .unwrap_or_else(|| home.join(LEDGER_FILE_NAME));

    let segmentation = file
        .as_ref()
        .and_then(|f| f.segmentation.clone())
        .unwrap_or_default();

    let review_file = file.as_ref().and_then(|f| f.review.as_ref());
    let defaults = ReviewSettings::default();
    let review = ReviewSettings {
        preview_chars: review_file
            .and_then(|r| r.preview_chars)
            .unwrap_or(defaults.preview_chars),
        wrap_width: review_file
            .and_then(|r| r.wrap_width)
            .unwrap_or(defaults.wrap_width),
    };

    Ok(ResolvedConfig {
        home,
        ledger,
        config_file: config_path,
        segmentation,
        review,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = match find_config_file() {
        Some(path) => {
            let file = load_config_file(&path)?;
            Some((path, file))
        }
        None => None,
    };

    resolve(
        config_file,
        std::env::var("TCREVIEW_HOME").ok(),
        std::env::var("TCREVIEW_LEDGER").ok(),
    )
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(temp: &TempDir, yaml: &str) -> PathBuf {
        let dir = temp.path().join(".tcreview");
        std::fs::create_dir_all(&dir).unwrap();
        let config_path = dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", yaml).unwrap();
        config_path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, None, None).unwrap();

        let expected_home = dirs::home_dir().unwrap().join(".tcreview");
        assert_eq!(config.home, expected_home);
        assert_eq!(config.ledger, expected_home.join(LEDGER_FILE_NAME));
        assert!(config.config_file.is_none());
        assert_eq!(config.segmentation, SegmenterConfig::default());
        assert_eq!(config.review, ReviewSettings::default());
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            &temp,
            r#"
version: "1.0"
paths:
  home: ./
  ledger: reviews.json
segmentation:
  min_sections: 3
  chunk_max_chars: 1500
review:
  wrap_width: 100
"#,
        );

        let file = load_config_file(&config_path).unwrap();
        assert_eq!(file.version, "1.0");
        assert_eq!(file.paths.ledger, Some("reviews.json".to_string()));

        let segmentation = file.segmentation.clone().unwrap();
        assert_eq!(segmentation.min_sections, 3);
        assert_eq!(segmentation.chunk_max_chars, 1500);
        // Unset thresholds keep their defaults
        assert_eq!(segmentation.paragraph_min_chars, 100);

        let config = resolve(Some((config_path.clone(), file)), None, None).unwrap();
        let tcreview_dir = config_path.parent().unwrap();
        assert_eq!(config.ledger, tcreview_dir.join("reviews.json"));
        assert_eq!(config.review.wrap_width, 100);
        assert_eq!(config.review.preview_chars, DEFAULT_PREVIEW_CHARS);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_env_overrides_file() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            &temp,
            r#"
version: "1.0"
paths:
  ledger: reviews.json
"#,
        );
        let file = load_config_file(&config_path).unwrap();

        let config = resolve(
            Some((config_path, file)),
            Some("/srv/tc".to_string()),
            Some("/srv/tc/other.json".to_string()),
        )
        .unwrap();
        assert_eq!(config.home, PathBuf::from("/srv/tc"));
        assert_eq!(config.ledger, PathBuf::from("/srv/tc/other.json"));
    }

    #[test]
    fn test_ledger_follows_home() {
        let config = resolve(None, Some("/srv/tc".to_string()), None).unwrap();
        assert_eq!(config.ledger, PathBuf::from("/srv/tc").join(LEDGER_FILE_NAME));
    }

    #[test]
    fn test_invalid_config_file() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(&temp, "paths: [not, a, map]");
        assert!(load_config_file(&config_path).is_err());
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
    }
}
