use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use anyhow::Result;

use crate::engine::config::EngineConfig;

pub const DEFAULT_CONFIG_FILE: &str = "huffpack.toml";
pub const DEFAULT_EXTENSION: &str = "hf";
pub const RESTORED_SUFFIX: &str = "unhf";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub extension: String,
    pub overwrite: bool,
    pub debug_level: u8,
    pub log_filter: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            overwrite: false,
            debug_level: 0,
            log_filter: "huffpack=info".to_string(),
        }
    }
}

impl ToolConfig {
    pub fn load_or_create(config_path: Option<&str>) -> Result<Self> {
        let config_file = config_path.unwrap_or(DEFAULT_CONFIG_FILE);

        if Path::new(config_file).exists() {
            let content = std::fs::read_to_string(config_file)?;
            let config: ToolConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save(config_file)?;
            Ok(config)
        }
    }

    pub fn save(&self, config_path: &str) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn engine(&self) -> EngineConfig {
        EngineConfig::with_debug(self.debug_level)
    }

    /// `input` plus the configured extension
    pub fn compressed_path(&self, input: &Path) -> PathBuf {
        let mut name = input.as_os_str().to_os_string();
        name.push(".");
        name.push(&self.extension);
        PathBuf::from(name)
    }

    /// `input` without the configured extension, or with `.unhf` appended
    /// when it does not carry it
    pub fn restored_path(&self, input: &Path) -> PathBuf {
        match input.extension() {
            Some(ext) if ext == self.extension.as_str() => input.with_extension(""),
            _ => {
                let mut name = input.as_os_str().to_os_string();
                name.push(".");
                name.push(RESTORED_SUFFIX);
                PathBuf::from(name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_output_names() {
        let config = ToolConfig::default();
        assert_eq!(config.compressed_path(Path::new("notes.txt")), PathBuf::from("notes.txt.hf"));
        assert_eq!(config.restored_path(Path::new("notes.txt.hf")), PathBuf::from("notes.txt"));
        assert_eq!(config.restored_path(Path::new("blob.bin")), PathBuf::from("blob.bin.unhf"));
    }

    #[test]
    fn creates_defaults_then_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huffpack.toml");
        let path = path.to_str().unwrap();

        let created = ToolConfig::load_or_create(Some(path)).unwrap();
        assert_eq!(created, ToolConfig::default());
        assert!(Path::new(path).exists());

        std::fs::write(path, "overwrite = true\ndebug_level = 4\n").unwrap();
        let loaded = ToolConfig::load_or_create(Some(path)).unwrap();
        assert!(loaded.overwrite);
        assert!(loaded.engine().verbose());
        assert_eq!(loaded.extension, "hf");
    }
}
