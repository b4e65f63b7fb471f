//! Signet 配置系统
//!
//! 支持 YAML 配置文件和环境变量

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Environment variable selecting the store backend
pub const ENV_STORE_BACKEND: &str = "SIGNET_STORE_BACKEND";
/// Environment variable selecting the output format
pub const ENV_OUTPUT_FORMAT: &str = "SIGNET_OUTPUT_FORMAT";
/// Environment variable selecting the log level
pub const ENV_LOG: &str = "SIGNET_LOG";

/// 配置错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Signet 主配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignetConfig {
    /// 存储配置
    pub store: Option<StoreConfig>,

    /// REPL 配置
    pub repl: Option<ReplConfig>,

    /// 输出配置
    pub output: Option<OutputConfig>,

    /// 日志配置
    pub logging: Option<LoggingConfig>,
}

impl Default for SignetConfig {
    fn default() -> Self {
        Self {
            store: Some(StoreConfig::default()),
            repl: Some(ReplConfig::default()),
            output: Some(OutputConfig::default()),
            logging: Some(LoggingConfig::default()),
        }
    }
}

impl SignetConfig {
    /// Load a YAML config file. Sections missing from the file fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: SignetConfig = serde_yaml::from_str(content)?;
        config.fill_defaults();
        config.logging().tracing_level()?;
        Ok(config)
    }

    fn fill_defaults(&mut self) {
        self.store.get_or_insert_with(StoreConfig::default);
        self.repl.get_or_insert_with(ReplConfig::default);
        self.output.get_or_insert_with(OutputConfig::default);
        self.logging.get_or_insert_with(LoggingConfig::default);
    }

    /// Apply `SIGNET_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup; empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value_of = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(raw) = value_of(ENV_STORE_BACKEND) {
            self.store_mut().backend = parse_value(ENV_STORE_BACKEND, &raw)?;
        }
        if let Some(raw) = value_of(ENV_OUTPUT_FORMAT) {
            self.output_mut().format = parse_value(ENV_OUTPUT_FORMAT, &raw)?;
        }
        if let Some(raw) = value_of(ENV_LOG) {
            let level: tracing::Level = parse_value(ENV_LOG, raw.trim())?;
            self.logging_mut().level = level.to_string().to_ascii_lowercase();
        }
        Ok(())
    }

    pub fn store(&self) -> StoreConfig {
        self.store.clone().unwrap_or_default()
    }

    pub fn repl(&self) -> ReplConfig {
        self.repl.clone().unwrap_or_default()
    }

    pub fn output(&self) -> OutputConfig {
        self.output.clone().unwrap_or_default()
    }

    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }

    pub fn store_mut(&mut self) -> &mut StoreConfig {
        self.store.get_or_insert_with(StoreConfig::default)
    }

    pub fn output_mut(&mut self) -> &mut OutputConfig {
        self.output.get_or_insert_with(OutputConfig::default)
    }

    pub fn logging_mut(&mut self) -> &mut LoggingConfig {
        self.logging.get_or_insert_with(LoggingConfig::default)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: raw.to_string(),
    })
}

/// 存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Single map, group operations scan every record
    #[default]
    Memory,
    /// Single map plus section/document indexes
    Indexed,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "indexed" => Ok(StoreBackend::Indexed),
            other => Err(format!("unknown store backend: {}", other)),
        }
    }
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreBackend::Memory => f.write_str("memory"),
            StoreBackend::Indexed => f.write_str("indexed"),
        }
    }
}

/// 存储配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// 存储类型
    #[serde(default)]
    pub backend: StoreBackend,
}

/// REPL 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplConfig {
    /// 提示符
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

fn default_prompt() -> String {
    "signet> ".to_string()
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
        }
    }
}

/// 输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {}", other)),
        }
    }
}

/// 输出配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// trace / debug / info / warn / error
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl LoggingConfig {
    pub fn tracing_level(&self) -> Result<tracing::Level, ConfigError> {
        parse_value("logging.level", self.level.trim())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
