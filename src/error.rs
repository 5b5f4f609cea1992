//! 全局错误类型定义
use std::io::Error as IoError;
use std::path::PathBuf;

use filterline_engine::error::{ConfigError, CoreError};
use tempfile::PersistError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterLineError {
    // 内核错误（解析、编译、流式处理）
    #[error(transparent)]
    Core(#[from] CoreError),

    // 配置相关错误
    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    // 基础错误
    #[error("IO failed: {0}")]
    Io(#[from] IoError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // 结果发布失败（临时文件改名）
    #[error("Failed to publish output: {0}")]
    PersistError(#[from] PersistError),
}

impl From<ConfigError> for FilterLineError {
    fn from(err: ConfigError) -> Self {
        FilterLineError::Core(CoreError::Config(err))
    }
}

impl FilterLineError {
    /// 是否为调用方主动取消
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FilterLineError::Core(CoreError::Cancelled { .. }))
    }
}

// 全局Result类型
pub type FlResult<T> = Result<T, FilterLineError>;
