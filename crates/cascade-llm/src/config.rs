//! Backend configuration, loaded once at startup.
//!
//! Sources in ascending precedence: `~/.cascade/config.toml`, then
//! `./cascade.toml` when the home file is absent, then environment
//! variables (`CASCADE_API_KEY` / `OPENAI_API_KEY`, `CASCADE_API_BASE`,
//! `CASCADE_MODEL`, `CASCADE_TIMEOUT_SECS`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "cascade.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BackendConfig {
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub model: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl BackendConfig {
    /// Load configuration from disk and the environment.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(file_config) = home_config_path().and_then(|path| Self::read_file(&path)) {
            config = file_config;
        } else if let Some(file_config) = Self::read_file(Path::new(CONFIG_FILE_NAME)) {
            config = file_config;
        }

        config.apply_env_overrides();
        config
    }

    fn read_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(config) => {
                log::debug!("loaded backend config from {}", path.display());
                Some(config)
            }
            Err(error) => {
                log::warn!("ignoring invalid config file {}: {}", path.display(), error);
                None
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("CASCADE_API_KEY") {
            self.api_key = Some(key);
        } else if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Ok(base) = std::env::var("CASCADE_API_BASE") {
            self.api_base = Some(base);
        }
        if let Ok(model) = std::env::var("CASCADE_MODEL") {
            self.model = Some(model);
        }
        if let Ok(secs) = std::env::var("CASCADE_TIMEOUT_SECS") {
            match secs.trim().parse() {
                Ok(parsed) => self.request_timeout_secs = Some(parsed),
                Err(_) => log::warn!("ignoring non-numeric CASCADE_TIMEOUT_SECS: {secs:?}"),
            }
        }
    }
}

fn home_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cascade").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_full_config() {
        let config: BackendConfig = toml::from_str(
            r#"
            api_key = "sk-test"
            api_base = "http://localhost:8080/v1"
            model = "gpt-4o"
            request_timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(config.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.request_timeout_secs, Some(30));
    }

    #[test]
    fn missing_fields_default_to_none() {
        let config: BackendConfig = toml::from_str("model = \"gpt-4o-mini\"").unwrap();
        assert_eq!(config.api_key, None);
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn read_file_accepts_valid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = \"sk-from-file\"").unwrap();

        let config = BackendConfig::read_file(file.path()).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-from-file"));
    }

    #[test]
    fn read_file_rejects_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_key = [not toml").unwrap();
        assert_eq!(BackendConfig::read_file(file.path()), None);
    }

    #[test]
    fn read_file_returns_none_for_missing_path() {
        assert_eq!(
            BackendConfig::read_file(Path::new("/nonexistent/cascade.toml")),
            None
        );
    }
}
