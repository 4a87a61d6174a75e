use crate::core::error::{MapperError, MapperResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 默认每条批量语句包含的实体数
pub const DEFAULT_BATCH_SIZE: usize = 250;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// 语句执行前 `USE` 的图空间
    pub space: String,
    pub batch_size: usize,
    pub log: LogConfig,
}

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            space: "default".to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "graphdb-mapper".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> MapperResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> MapperResult<()> {
        self.validate()?;
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> MapperResult<()> {
        if self.batch_size == 0 {
            return Err(MapperError::Config("batch_size 必须大于 0".to_string()));
        }
        if self.space.trim().is_empty() {
            return Err(MapperError::Config("space 不能为空".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.space, "default");
        assert_eq!(config.batch_size, 250);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_config_load_save() {
        let temp_file = NamedTempFile::new().expect("Failed to create temporary file");

        let config = Config {
            space: "nba".to_string(),
            batch_size: 100,
            ..Config::default()
        };
        config.save(temp_file.path()).expect("Failed to save config");

        let loaded_config =
            Config::load(temp_file.path()).expect("Failed to load config from temporary file");
        assert_eq!(config, loaded_config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        temp_file
            .write_all(b"space = \"sns\"\n")
            .expect("Failed to write TOML content to temporary file");

        let loaded = Config::load(temp_file.path()).expect("Failed to load config");
        assert_eq!(loaded.space, "sns");
        assert_eq!(loaded.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(loaded.log, LogConfig::default());
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temporary file");
        temp_file
            .write_all(b"batch_size = 0\n")
            .expect("Failed to write TOML content to temporary file");

        let err = Config::load(temp_file.path()).expect_err("batch_size 为 0 应当失败");
        assert!(matches!(err, MapperError::Config(_)));
    }
}
