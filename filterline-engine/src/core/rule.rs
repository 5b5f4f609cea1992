use regex::Regex;

use super::enums::RuleSetKind;

/// 编译后的 general 规则
/// 职责：封装单条规则的源正则、跳过区间终止正则与输出模板
#[derive(Debug, Clone)]
pub struct GeneralRule {
    /// 与行内容匹配的源正则（必填）
    pub source_pattern: Regex,
    /// 命中后开启跳过区间，直到某行匹配该正则（含该行）
    pub until_pattern: Option<Regex>,
    /// 输出模板，命中时追加全部捕获组
    pub destination_template: Option<String>,
    /// 行标签（4字符右对齐）
    pub tag: Option<String>,
    /// 全局标记，命中后覆盖引擎当前标记
    pub flag: Option<String>,
}

/// general 类型的规则体
#[derive(Debug, Clone)]
pub struct GeneralRuleSet {
    /// 前缀正则，已追加 `(.+)` 捕获剩余内容
    pub prefix_pattern: Option<Regex>,
    /// 按声明顺序排列的规则
    pub rules: Vec<GeneralRule>,
}

/// 规则体：按类型区分的可执行规则
#[derive(Debug, Clone)]
pub enum RuleBody {
    /// stringlist / stringlist_notcontainany
    Literals(Vec<String>),
    /// regexlist / regexlist_notmatchany
    Patterns(Vec<Regex>),
    /// general
    General(GeneralRuleSet),
}

/// 编译后的规则集（构建完成后不可变）
#[derive(Debug, Clone)]
pub struct CompiledRuleSet {
    kind: RuleSetKind,
    body: RuleBody,
}

impl CompiledRuleSet {
    /// 仅供编译器构造，kind 与 body 的对应关系由编译器保证
    pub(crate) fn new(kind: RuleSetKind, body: RuleBody) -> Self {
        Self { kind, body }
    }

    pub fn kind(&self) -> RuleSetKind {
        self.kind
    }

    pub fn body(&self) -> &RuleBody {
        &self.body
    }

    /// 规则条数
    pub fn rule_count(&self) -> usize {
        match &self.body {
            RuleBody::Literals(list) => list.len(),
            RuleBody::Patterns(list) => list.len(),
            RuleBody::General(set) => set.rules.len(),
        }
    }
}
