// 核心公共结构体+枚举
pub mod core;
// 错误类型
pub mod error;
// 值树+结构化文本解析
pub mod markup;
// 规则集编译
pub mod compiler;
// 行规则引擎
pub mod engine;
// 流式驱动
pub mod driver;
// 通用工具
pub mod utils;

// 顶层导出常用类型
pub use compiler::RuleSetCompiler;
pub use core::{CompiledRuleSet, GeneralRule, GeneralRuleSet, RuleBody, RuleSetKind};
pub use driver::{CancelFlag, LineStreamer, StreamStats};
pub use engine::LineEngine;
pub use error::{ConfigError, CoreError, CoreResult};
pub use markup::{Item, MarkupParser, Record, Value};
