use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_URL: &str = "http://localhost:5000/";
pub const DEFAULT_TITLE: &str = "CredVerse Wallet";
pub const DEFAULT_OUTPUT: &str = "verification_dashboard.png";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings for one verification run. The defaults reproduce the
/// original hard-coded dashboard check.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct VerifyConfig {
    /// Target URL to open.
    pub url: String,
    /// Title the page is expected to carry. The check is best-effort
    /// and never fails the run.
    pub expected_title: String,
    /// Where the screenshot is written. Overwritten on every run.
    pub output: PathBuf,
    /// Bound on navigation, in seconds.
    pub timeout_secs: u64,
    pub headless: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            expected_title: DEFAULT_TITLE.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            headless: true,
        }
    }
}

impl VerifyConfig {
    /// Look for a config file in the usual places, falling back to the
    /// built-in defaults when none parses.
    pub fn load() -> Self {
        let paths = vec![
            PathBuf::from("config.toml"),
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("dashcheck/config.toml"),
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".dashcheck/config.toml"),
        ];

        for path in paths {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config at {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Apply `DASHCHECK_*` environment overrides on top of whatever the
    /// file (or the defaults) provided.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("DASHCHECK_URL") {
            self.url = url;
        }
        if let Ok(title) = std::env::var("DASHCHECK_TITLE") {
            self.expected_title = title;
        }
        if let Ok(output) = std::env::var("DASHCHECK_OUTPUT") {
            self.output = PathBuf::from(output);
        }
        if let Ok(secs) = std::env::var("DASHCHECK_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(v) => self.timeout_secs = v,
                Err(e) => tracing::warn!("Ignoring DASHCHECK_TIMEOUT_SECS: {}", e),
            }
        }
    }

    pub fn nav_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_reproduce_original_run() {
        let config = VerifyConfig::default();
        assert_eq!(config.url, "http://localhost:5000/");
        assert_eq!(config.expected_title, "CredVerse Wallet");
        assert_eq!(config.output, PathBuf::from("verification_dashboard.png"));
        assert_eq!(config.nav_timeout(), Duration::from_secs(30));
        assert!(config.headless);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "url = \"http://localhost:8080/\"").unwrap();
        writeln!(file, "timeout_secs = 5").unwrap();

        let config = VerifyConfig::load_from(file.path()).unwrap();
        assert_eq!(config.url, "http://localhost:8080/");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.expected_title, DEFAULT_TITLE);
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "url = [not toml").unwrap();
        let err = VerifyConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = VerifyConfig::load_from(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    // One test covers the whole env layer so parallel tests never race
    // on the DASHCHECK_* variables.
    #[test]
    fn env_overrides_file_and_defaults() {
        std::env::set_var("DASHCHECK_URL", "http://localhost:9999/");
        std::env::set_var("DASHCHECK_TITLE", "Env Title");
        std::env::set_var("DASHCHECK_OUTPUT", "env.png");
        std::env::set_var("DASHCHECK_TIMEOUT_SECS", "7");

        let mut config = VerifyConfig::default();
        config.apply_env();

        assert_eq!(config.url, "http://localhost:9999/");
        assert_eq!(config.expected_title, "Env Title");
        assert_eq!(config.output, PathBuf::from("env.png"));
        assert_eq!(config.timeout_secs, 7);

        // A timeout that does not parse is ignored, keeping the
        // previous value.
        std::env::set_var("DASHCHECK_TIMEOUT_SECS", "soon");
        config.apply_env();
        assert_eq!(config.timeout_secs, 7);

        std::env::remove_var("DASHCHECK_URL");
        std::env::remove_var("DASHCHECK_TITLE");
        std::env::remove_var("DASHCHECK_OUTPUT");
        std::env::remove_var("DASHCHECK_TIMEOUT_SECS");
    }
}
