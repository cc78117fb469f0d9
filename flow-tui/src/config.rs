use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app::Theme;

const APP_DIR: &str = "flow-tui";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Base URL of the record API, e.g. "https://api.example.com/v1"
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub public_key: String,
    /// Rows per page in list views.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Default log filter. `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub theme: Theme,
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            project_id: String::new(),
            public_key: String::new(),
            page_size: default_page_size(),
            log_level: default_log_level(),
            theme: Theme::default(),
        }
    }
}

pub fn root_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Cannot determine config directory")?
        .join(APP_DIR))
}

impl FlowConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(root_path()?.join("config.toml"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(root_path()?.join("flow-tui.log"))
    }

    /// Defaults, then the config file (if any), then `FLOW_*` environment variables.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("api_url", default_api_url())?
            .set_default("page_size", default_page_size() as i64)?
            .set_default("log_level", default_log_level())?
            .add_source(config::File::from(path.to_path_buf()).required(false))
            .add_source(config::Environment::with_prefix("FLOW"))
            .build()
            .with_context(|| format!("Failed to read config at {}", path.display()))?;

        let mut config: Self = settings
            .try_deserialize()
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        if config.page_size == 0 {
            config.page_size = default_page_size();
        }
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(())
    }

    /// Set `theme` in the config file, leaving its other keys as written.
    /// Values that came from the environment are never copied into the file.
    pub fn save_theme(path: &Path, theme: Theme) -> Result<()> {
        let mut table = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            raw.parse::<toml::Table>()
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        } else {
            toml::Table::new()
        };
        table.insert("theme".to_string(), toml::Value::String(theme.to_string()));

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(&table)?)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(())
    }

    /// Write a default config file if none exists. Returns the path.
    pub fn ensure_exists() -> Result<PathBuf> {
        let path = Self::config_path()?;
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FlowConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.theme, Theme::Light);
    }

    #[test]
    fn saved_values_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = FlowConfig {
            project_id: "proj".to_string(),
            page_size: 5,
            theme: Theme::Dark,
            ..FlowConfig::default()
        };
        config.save_to(&path).unwrap();

        let loaded = FlowConfig::load_from(&path).unwrap();
        assert_eq!(loaded.project_id, "proj");
        assert_eq!(loaded.page_size, 5);
        assert_eq!(loaded.theme, Theme::Dark);
    }

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "theme = \"dark\"\n").unwrap();

        let loaded = FlowConfig::load_from(&path).unwrap();
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.api_url, "http://localhost:8080");
    }

    #[test]
    fn saving_the_theme_keeps_other_keys_and_adds_nothing_else() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "page_size = 5\napi_url = \"https://records.test\"\n").unwrap();

        FlowConfig::save_theme(&path, Theme::Dark).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("project_id"));
        assert!(!raw.contains("public_key"));
        let loaded = FlowConfig::load_from(&path).unwrap();
        assert_eq!(loaded.theme, Theme::Dark);
        assert_eq!(loaded.page_size, 5);
        assert_eq!(loaded.api_url, "https://records.test");
    }
}
