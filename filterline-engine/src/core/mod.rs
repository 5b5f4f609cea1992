mod enums;
mod rule;

// 导出常用项
pub use enums::RuleSetKind;
pub use rule::{CompiledRuleSet, GeneralRule, GeneralRuleSet, RuleBody};
