//! filterline - 按规则逐行过滤日志文件

pub mod config;
pub mod error;
pub mod rule;
pub mod runner;

// 导出全局错误类型
pub use self::error::{FilterLineError, FlResult};

// 导出配置模块核心结构体与构建器
pub use crate::config::{ConfigOrigin, CustomConfigBuilder, FilterConfig, OutputOptions};

// 导出规则加载与临时过滤器
pub use crate::rule::{ConfigFormat, ConfigPathManager, InputFilter, RuleLoader};

// 导出文件执行器
pub use crate::runner::{FileRunner, OutputPlan, RunReport};

// 导出内核常用类型
pub use filterline_engine::{
    CancelFlag, ConfigError, CoreError, CompiledRuleSet, LineEngine, LineStreamer, RuleSetCompiler, RuleSetKind, StreamStats,
};
