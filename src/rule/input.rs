//! 临时输入过滤器
//! 单个字符串或正则，转换为只有一条规则的列表型规则集，复用同一套编译与引擎
use filterline_engine::markup::{Item, Record, Value};
use filterline_engine::utils::short_preview;
use filterline_engine::{CompiledRuleSet, RuleSetCompiler, RuleSetKind};

use crate::error::{FilterLineError, FlResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFilter {
    kind: RuleSetKind,
    input: String,
}

impl InputFilter {
    /// 保留包含该字符串的行
    pub fn contains(input: impl Into<String>) -> FlResult<Self> {
        Self::new(RuleSetKind::StringList, input.into())
    }

    /// 保留不包含该字符串的行
    pub fn not_contains(input: impl Into<String>) -> FlResult<Self> {
        Self::new(RuleSetKind::StringListExclude, input.into())
    }

    /// 保留匹配该正则的行
    pub fn matches(input: impl Into<String>) -> FlResult<Self> {
        Self::new(RuleSetKind::RegexList, input.into())
    }

    /// 保留不匹配该正则的行
    pub fn not_matches(input: impl Into<String>) -> FlResult<Self> {
        Self::new(RuleSetKind::RegexListExclude, input.into())
    }

    fn new(kind: RuleSetKind, input: String) -> FlResult<Self> {
        if input.is_empty() {
            return Err(FilterLineError::InvalidInput("No input".to_string()));
        }
        log::debug!("Input filter: type={}, input={}", kind, short_preview(&input, 80));
        Ok(Self { kind, input })
    }

    pub fn kind(&self) -> RuleSetKind {
        self.kind
    }

    /// 等价的配置值树
    pub fn to_record(&self) -> Record {
        [
            ("type", Value::from(self.kind.as_str())),
            ("rules", Value::Array(vec![Item::String(self.input.clone())])),
        ]
        .into_iter()
        .collect()
    }

    /// 编译为规则集，非法正则返回 InvalidPattern
    pub fn compile(&self) -> FlResult<CompiledRuleSet> {
        Ok(RuleSetCompiler::compile(&self.to_record())?)
    }
}
