//! 规则集编译器
//! 仅负责将值树校验并编译为可执行规则集，全有或全无：首个错误即终止
use std::time::Instant;

use regex::Regex;

use crate::core::{CompiledRuleSet, GeneralRule, GeneralRuleSet, RuleBody, RuleSetKind};
use crate::error::ConfigError;
use crate::markup::{Item, Record, Value};

const FIELD_TYPE: &str = "type";
const FIELD_RULES: &str = "rules";
const FIELD_PREFIX: &str = "prefix";
const FIELD_SRC: &str = "src";
const FIELD_UNTIL: &str = "until";
const FIELD_DEST: &str = "dest";
const FIELD_TAG: &str = "tag";
const FIELD_FLAG: &str = "flag";

/// 前缀正则的剩余内容捕获组
const PREFIX_REMAINDER: &str = "(.+)";

/// 规则集编译器
pub struct RuleSetCompiler;

impl RuleSetCompiler {
    /// 编译规则集
    pub fn compile(raw: &Record) -> Result<CompiledRuleSet, ConfigError> {
        let start = Instant::now();

        // 1. 规则集类型，缺失或为空时默认 regexlist
        let kind = match raw.get_non_empty_str(FIELD_TYPE) {
            Some(name) => name.parse::<RuleSetKind>()?,
            None => {
                log::debug!("No config type specified, default to {}", RuleSetKind::default());
                RuleSetKind::default()
            }
        };

        // 2. rules 字段必须存在
        let rules = Self::rules_field(raw)?;

        // 3. 按类型编译规则体
        let body = match kind {
            RuleSetKind::StringList | RuleSetKind::StringListExclude => {
                RuleBody::Literals(Self::string_rules(rules)?.into_iter().map(str::to_string).collect())
            }
            RuleSetKind::RegexList | RuleSetKind::RegexListExclude => {
                RuleBody::Patterns(Self::compile_pattern_list(rules)?)
            }
            RuleSetKind::General => RuleBody::General(Self::compile_general(raw, rules)?),
        };

        let compiled = CompiledRuleSet::new(kind, body);
        log::debug!(
            "Rule set compiled: type={}, rules={}, elapsed={:?}",
            kind,
            compiled.rule_count(),
            start.elapsed()
        );
        Ok(compiled)
    }

    fn rules_field(raw: &Record) -> Result<&[Item], ConfigError> {
        match raw.get(FIELD_RULES) {
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(Value::String(s)) if !s.is_empty() => Err(ConfigError::RulesNotArray),
            _ => Err(ConfigError::MissingRules),
        }
    }

    /// 列表型规则：所有元素必须是裸字符串
    fn string_rules(rules: &[Item]) -> Result<Vec<&str>, ConfigError> {
        rules
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Item::String(s) => Ok(s.as_str()),
                Item::Record(_) | Item::Scalar(_) => {
                    Err(ConfigError::InvalidRuleType { index, expected: "string" })
                }
            })
            .collect()
    }

    fn compile_pattern_list(rules: &[Item]) -> Result<Vec<Regex>, ConfigError> {
        Self::string_rules(rules)?
            .into_iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect()
    }

    fn compile_general(raw: &Record, rules: &[Item]) -> Result<GeneralRuleSet, ConfigError> {
        let prefix_pattern = match raw.get_non_empty_str(FIELD_PREFIX) {
            Some(prefix) => Some(
                Regex::new(&format!("{}{}", prefix, PREFIX_REMAINDER)).map_err(|source| {
                    ConfigError::InvalidPrefixPattern { pattern: prefix.to_string(), source }
                })?,
            ),
            None => None,
        };

        let rules = rules
            .iter()
            .enumerate()
            .map(|(index, item)| match item {
                Item::Record(rule) => Self::compile_general_rule(index, rule),
                Item::String(_) | Item::Scalar(_) => {
                    Err(ConfigError::InvalidRuleType { index, expected: "record" })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GeneralRuleSet { prefix_pattern, rules })
    }

    fn compile_general_rule(index: usize, rule: &Record) -> Result<GeneralRule, ConfigError> {
        // 空 src 编译为空正则，匹配每一行
        let src = rule.get_str(FIELD_SRC).ok_or(ConfigError::MissingSourcePattern { index })?;
        let source_pattern = Regex::new(src).map_err(|source| ConfigError::InvalidSourcePattern {
            pattern: src.to_string(),
            source,
        })?;

        let until_pattern = match rule.get_non_empty_str(FIELD_UNTIL) {
            Some(until) => Some(Regex::new(until).map_err(|source| {
                ConfigError::InvalidUntilPattern { pattern: until.to_string(), source }
            })?),
            None => None,
        };

        Ok(GeneralRule {
            source_pattern,
            until_pattern,
            destination_template: rule.get_non_empty_str(FIELD_DEST).map(str::to_string),
            tag: rule.get_str(FIELD_TAG).map(str::to_string),
            // 空 flag 也是有效值：命中时清空当前标记
            flag: rule.get_str(FIELD_FLAG).map(str::to_string),
        })
    }
}
