// Signet Core - 核心数据模型
//!
//! 包含：
//! - Signature: 签名记录与行/分区/文档标识
//! - Clock: 写入时间来源
//! - Config: YAML 配置与环境变量覆盖

mod signature;
mod clock;
pub mod config;

pub use signature::*;
pub use clock::*;
pub use config::{
    ConfigError, LoggingConfig, OutputConfig, OutputFormat, ReplConfig, SignetConfig,
    StoreBackend, StoreConfig,
};
