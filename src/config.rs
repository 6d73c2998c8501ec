use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Saved connection settings, keyed by context name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub current_context: String,
    pub contexts: HashMap<String, ContextConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub server_url: String,
    pub access_token: String,
    pub email: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            current_context: "default".to_string(),
            contexts: HashMap::new(),
        }
    }
}

impl Config {
    /// Primary config location: ~/.config/<project>/<project>.yml
    pub fn config_path() -> PathBuf {
        let project_name = env!("CARGO_PKG_NAME");
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(project_name)
            .join(format!("{}.yml", project_name))
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        let primary_config = Self::config_path();
        if primary_config.exists() {
            match Self::load_from_file(&primary_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// The context selected by `current_context`, if any
    pub fn current(&self) -> Option<&ContextConfig> {
        self.contexts.get(&self.current_context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.current_context, "default");
        assert!(config.contexts.is_empty());
        assert!(config.current().is_none());
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let missing = PathBuf::from("/nonexistent/toolsync.yml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toolsync.yml");
        fs::write(
            &path,
            r#"
current_context: staging
contexts:
  staging:
    server_url: http://staging:8001
    access_token: tok-123
    email: dev@example.com
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.current_context, "staging");
        let ctx = config.current().unwrap();
        assert_eq!(ctx.server_url, "http://staging:8001");
        assert_eq!(ctx.access_token, "tok-123");
        assert_eq!(ctx.email, "dev@example.com");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toolsync.yml");
        fs::write(
            &path,
            "contexts:\n  default:\n    server_url: http://localhost:8001\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.current_context, "default");
        let ctx = config.current().unwrap();
        assert_eq!(ctx.server_url, "http://localhost:8001");
        assert!(ctx.access_token.is_empty());
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.contexts.insert(
            "default".to_string(),
            ContextConfig {
                server_url: "http://localhost:8001".to_string(),
                access_token: "secret".to_string(),
                email: "me@example.com".to_string(),
            },
        );

        let yaml = serde_yaml::to_string(&config).unwrap();
        let restored: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(restored.current_context, "default");
        assert_eq!(restored.current().unwrap().access_token, "secret");
    }
}
