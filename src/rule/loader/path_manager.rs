use std::path::{Path, PathBuf};

use crate::config::filter::JSON_EXTENSION;
use crate::error::{FilterLineError, FlResult};
use crate::FilterConfig;

/// 配置文件格式：按扩展名判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Markup,
}

impl ConfigFormat {
    /// `.json` 结尾按 JSON 解码，其余一律按结构化文本解析
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext == JSON_EXTENSION => ConfigFormat::Json,
            _ => ConfigFormat::Markup,
        }
    }
}

/// 配置路径管理器
#[derive(Debug, Default)]
pub struct ConfigPathManager;

impl ConfigPathManager {
    /// 定位配置文件：返回第一个存在的候选路径
    /// 都不存在时返回 ConfigNotFound，携带最后尝试的路径
    pub fn locate(&self, config: &FilterConfig) -> FlResult<PathBuf> {
        let candidates = config.candidate_paths();
        for path in &candidates {
            if path.is_file() {
                log::debug!("Config file located: {}", path.display());
                return Ok(path.clone());
            }
            log::debug!("Config candidate not found: {}", path.display());
        }
        let tried = candidates.into_iter().last().unwrap_or_default();
        Err(FilterLineError::ConfigNotFound(tried))
    }
}
