use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, SiteError};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "site.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub db: DbConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// Path to the SQLite database file
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter directive when `RUST_LOG` is unset
    pub level: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("site.db"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SiteError::Config(format!("Failed to read config file: {e}")))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| SiteError::Config(format!("Failed to parse config: {e}")))?;

        config.validate()?;

        Ok(config)
    }

    /// Explicit file if given, else `site.toml` when present, else defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.db.path.as_os_str().is_empty() {
            return Err(SiteError::Config("db.path cannot be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.db.path, PathBuf::from("site.db"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_parse_full() {
        let config = Config::parse(
            r#"
            [db]
            path = "data/pages.db"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.db.path, PathBuf::from("data/pages.db"));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_parse_partial_uses_defaults() {
        let config = Config::parse("[db]\npath = \"x.db\"\n").unwrap();
        assert_eq!(config.db.path, PathBuf::from("x.db"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_empty_db_path_rejected() {
        let result = Config::parse("[db]\npath = \"\"\n");
        assert!(matches!(result, Err(SiteError::Config(_))));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = Config::parse("[db\npath = 1");
        assert!(matches!(result, Err(SiteError::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[db]\npath = \"from-file.db\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.db.path, PathBuf::from("from-file.db"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/nonexistent/site.toml");
        assert!(matches!(result, Err(SiteError::Config(_))));
    }
}
