//! filterline-engine 内核错误定义
//! 封装解析、编译、流式处理阶段的全部错误，与宿主层错误解耦，基于thiserror实现类型安全处理
use thiserror::Error;

use std::io::Error as IoError;
use serde_json::Error as SerdeJsonError;

/// 规则配置错误
/// 编译阶段遇到的第一个错误即终止编译，不会产生部分规则集
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `type` 字段不是受支持的规则集类型
    #[error("Unsupported rule set type '{0}', supported types are stringlist/stringlist_notcontainany/regexlist/regexlist_notmatchany/general (regexlist if not specified)")]
    UnsupportedKind(String),

    /// 缺少 `rules` 字段
    #[error("No rules in config")]
    MissingRules,

    /// `rules` 字段存在但不是数组
    #[error("Field 'rules' must be an array")]
    RulesNotArray,

    /// 规则元素类型与规则集类型不符
    #[error("Rule #{index} must be a {expected}")]
    InvalidRuleType { index: usize, expected: &'static str },

    /// 列表型正则规则编译失败
    #[error("Rule regex incorrect: {pattern} ({source})")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// `prefix` 正则编译失败
    #[error("Prefix regex incorrect: {pattern} ({source})")]
    InvalidPrefixPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// general 规则缺少 `src` 字段
    #[error("Rule #{index} has no 'src' field")]
    MissingSourcePattern { index: usize },

    /// `src` 正则编译失败
    #[error("Src regex incorrect: {pattern} ({source})")]
    InvalidSourcePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// `until` 正则编译失败
    #[error("Until regex incorrect: {pattern} ({source})")]
    InvalidUntilPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// 内核核心错误枚举
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================== 输入相关错误 =====================
    /// 输入源不可读 / 写出失败
    #[error("IO failed: {0}")]
    Io(#[from] IoError),

    /// 结构化文本无法解析（仅文件缺失或JSON形状不受支持）
    #[error("Parse failed: {0}")]
    Parse(String),

    /// JSON文档语法错误
    #[error("JSON parse failed: {0}")]
    Json(#[from] SerdeJsonError),

    // ===================== 编译相关错误 =====================
    /// 规则配置错误
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    // ===================== 运行时错误 =====================
    /// 行过滤过程中的非预期失败，终止本次过滤
    #[error("Filter runtime error: {0}")]
    Runtime(String),

    /// 调用方取消了本次过滤
    #[error("Filter cancelled after {lines_read} lines")]
    Cancelled { lines_read: u64 },
}

/// 内核层全局Result类型别名
pub type CoreResult<T> = Result<T, CoreError>;
