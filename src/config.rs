use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{AppConfig, Theme};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ai_api_key: String,

    #[serde(default = "default_ai_model")]
    pub ai_model: String,

    #[serde(default = "default_collect_interval")]
    pub collect_interval_minutes: u32,

    #[serde(default)]
    pub auto_rewrite: bool,

    #[serde(default)]
    pub theme: Theme,

    /// Start with the bundled sample articles and accounts
    #[serde(default = "default_seed_samples")]
    pub seed_samples: bool,
}

fn default_ai_model() -> String {
    "gpt-4".to_string()
}

fn default_collect_interval() -> u32 {
    60
}

fn default_seed_samples() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ai_api_key: String::new(),
            ai_model: default_ai_model(),
            collect_interval_minutes: default_collect_interval(),
            auto_rewrite: false,
            theme: Theme::Light,
            seed_samples: default_seed_samples(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Read the config at `path`, writing the defaults there if it doesn't exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            if config.collect_interval_minutes == 0 {
                tracing::warn!("collect_interval_minutes is 0 in {:?}", path);
            }
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("content-ops")
            .join("config.toml")
    }

    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            ai_api_key: self.ai_api_key.clone(),
            ai_model: self.ai_model.clone(),
            collect_interval: self.collect_interval_minutes,
            auto_rewrite: self.auto_rewrite,
            theme: self.theme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.ai_model, "gpt-4");
        assert_eq!(config.collect_interval_minutes, 60);
        assert!(!config.auto_rewrite);
        assert_eq!(config.theme, Theme::Light);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "ai_api_key = \"k\"\ntheme = \"dark\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.ai_api_key, "k");
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.ai_model, "gpt-4");
        assert!(config.seed_samples);
    }

    #[test]
    fn saved_config_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            ai_model: "claude-3-sonnet".to_string(),
            collect_interval_minutes: 15,
            ..Config::default()
        };

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded.ai_model, "claude-3-sonnet");
        assert_eq!(loaded.collect_interval_minutes, 15);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "theme = [").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(AppError::ConfigParse(_))
        ));
    }
}
