use crate::error::{MindmapError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_MAP: &str = "my_map.json";

/// Overrides the data directory (maps and config live there).
pub const HOME_ENV: &str = "MINDMAP_HOME";

/// Configuration for mindmap, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MindmapConfig {
    /// File name of the map used when no `--file` is given
    #[serde(default = "default_map")]
    pub default_map: String,

    /// Show node ids next to node text in tree output
    #[serde(default = "default_show_ids")]
    pub show_ids: bool,
}

fn default_map() -> String {
    DEFAULT_MAP.to_string()
}

fn default_show_ids() -> bool {
    true
}

impl Default for MindmapConfig {
    fn default() -> Self {
        Self {
            default_map: default_map(),
            show_ids: default_show_ids(),
        }
    }
}

impl MindmapConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(MindmapError::Io)?;
        let config: MindmapConfig =
            serde_json::from_str(&content).map_err(MindmapError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(MindmapError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(MindmapError::Serialization)?;
        fs::write(config_path, content).map_err(MindmapError::Io)?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["default-map", "show-ids"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default-map" => Some(self.default_map.clone()),
            "show-ids" => Some(self.show_ids.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "default-map" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(MindmapError::Config("default-map cannot be empty".into()));
                }
                self.default_map = if value.ends_with(".json") {
                    value.to_string()
                } else {
                    format!("{value}.json")
                };
            }
            "show-ids" => {
                self.show_ids = match value.to_ascii_lowercase().as_str() {
                    "true" | "yes" | "on" | "1" => true,
                    "false" | "no" | "off" | "0" => false,
                    other => {
                        return Err(MindmapError::Config(format!(
                            "show-ids expects true or false, got '{other}'"
                        )))
                    }
                };
            }
            other => return Err(MindmapError::Config(format!("Unknown config key: {other}"))),
        }
        Ok(())
    }

    /// Path of the default map inside `data_dir`.
    pub fn default_map_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.default_map)
    }
}

/// Directory holding maps and config: `$MINDMAP_HOME`, else the platform data dir.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    ProjectDirs::from("com", "mindmap", "mindmap")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MindmapError::Config("Could not determine data directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = MindmapConfig::default();
        assert_eq!(config.default_map, "my_map.json");
        assert!(config.show_ids);
    }

    #[test]
    fn test_set_default_map_adds_extension() {
        let mut config = MindmapConfig::default();
        config.set("default-map", "work").unwrap();
        assert_eq!(config.default_map, "work.json");
        config.set("default-map", "home.json").unwrap();
        assert_eq!(config.get("default-map").unwrap(), "home.json");
    }

    #[test]
    fn test_set_show_ids() {
        let mut config = MindmapConfig::default();
        config.set("show-ids", "off").unwrap();
        assert!(!config.show_ids);
        assert!(config.set("show-ids", "maybe").is_err());
    }

    #[test]
    fn test_unknown_key() {
        let mut config = MindmapConfig::default();
        assert!(config.get("colour").is_none());
        assert!(matches!(
            config.set("colour", "red"),
            Err(MindmapError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_config() {
        let dir = TempDir::new().unwrap();
        let config = MindmapConfig::load(dir.path().join("nowhere")).unwrap();
        assert_eq!(config, MindmapConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let mut config = MindmapConfig::default();
        config.set("default-map", "ideas").unwrap();
        config.save(dir.path()).unwrap();

        let loaded = MindmapConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.default_map, "ideas.json");
        assert_eq!(
            loaded.default_map_path(dir.path()),
            dir.path().join("ideas.json")
        );
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), r#"{"show_ids": false}"#).unwrap();
        let loaded = MindmapConfig::load(dir.path()).unwrap();
        assert_eq!(loaded.default_map, DEFAULT_MAP);
        assert!(!loaded.show_ids);
    }
}
