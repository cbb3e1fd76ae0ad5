use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

/// Explicit theme value threaded into the views; no ambient global.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            theme: Theme::default(),
        }
    }
}

impl Config {
    fn get_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("org", "taskmate", "taskmate") {
            let config_dir = proj_dirs.config_dir();
            if !config_dir.exists() {
                fs::create_dir_all(config_dir)?;
            }
            return Ok(config_dir.join("config.toml"));
        }
        Err(anyhow::anyhow!("Could not determine config path"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::get_path()?;
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            return Ok(config);
        }
        Err(anyhow::anyhow!("Config file not found"))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::get_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get_path_string() -> Result<String> {
        let path = Self::get_path()?;
        Ok(path.to_string_lossy().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_fall_back_to_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.base_url, "http://localhost:3000/api");
        assert_eq!(cfg.theme, Theme::Light);
    }

    #[test]
    fn test_theme_parses_lowercase() {
        let cfg: Config = toml::from_str("theme = \"dark\"").unwrap();
        assert_eq!(cfg.theme, Theme::Dark);
    }
}
