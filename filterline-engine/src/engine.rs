//! 行规则引擎
//! 核心职责：
//! 1. 按规则集类型判定单行保留/丢弃
//! 2. general 类型下维护跨行状态（当前标记、跳过区间）
//! 3. 构造 general 类型的输出行
use std::borrow::Cow;

use regex::Captures;

use crate::core::{CompiledRuleSet, GeneralRule, GeneralRuleSet, RuleBody, RuleSetKind};
use crate::utils::pad::pad_with_blank;

/// 标记、标签字段宽度
const LABEL_WIDTH: usize = 4;
/// 前缀捕获组宽度
const PREFIX_GROUP_WIDTH: usize = 8;

/// 行规则引擎（一次过滤会话一个实例）
/// 设计说明：
/// - rule_set: 编译后的规则集（只读借用）
/// - current_flag / active_until: 会话内跨行状态，只由本实例按行序修改
#[derive(Debug)]
pub struct LineEngine<'a> {
    rule_set: &'a CompiledRuleSet,
    current_flag: String,
    /// 开启跳过区间的规则下标
    active_until: Option<usize>,
}

impl<'a> LineEngine<'a> {
    pub fn new(rule_set: &'a CompiledRuleSet) -> Self {
        Self {
            rule_set,
            current_flag: String::new(),
            active_until: None,
        }
    }

    /// 当前标记（初始为空）
    pub fn current_flag(&self) -> &str {
        &self.current_flag
    }

    /// 是否处于跳过区间
    pub fn in_until_region(&self) -> bool {
        self.active_until.is_some()
    }

    pub fn kind(&self) -> RuleSetKind {
        self.rule_set.kind()
    }

    /// 处理单行：返回要写出的行，None 表示丢弃
    /// 必须按输入顺序逐行调用
    pub fn evaluate(&mut self, line: &str) -> Option<String> {
        let rule_set = self.rule_set;
        let exclude = rule_set.kind().is_exclude();
        match rule_set.body() {
            RuleBody::Literals(literals) => {
                let hit = literals.iter().any(|literal| line.contains(literal.as_str()));
                (hit != exclude).then(|| line.to_string())
            }
            RuleBody::Patterns(patterns) => {
                let hit = patterns.iter().any(|pattern| pattern.is_match(line));
                (hit != exclude).then(|| line.to_string())
            }
            RuleBody::General(general) => self.evaluate_general(general, line),
        }
    }

    fn evaluate_general(&mut self, general: &GeneralRuleSet, line: &str) -> Option<String> {
        // a. 跳过区间内原样输出，命中终止正则的行也原样输出后退出区间
        if let Some(idx) = self.active_until {
            let ends_region = general.rules[idx]
                .until_pattern
                .as_ref()
                .map_or(true, |until| until.is_match(line));
            if ends_region {
                self.active_until = None;
            }
            return Some(line.to_string());
        }

        // b. 前缀提取
        let (prefix, content) = match &general.prefix_pattern {
            Some(prefix_pattern) => {
                let caps = prefix_pattern.captures(line)?;
                split_prefix(&caps)
            }
            None => (String::new(), line),
        };

        // c. 按声明顺序匹配，首个命中者胜出
        let (idx, rule, caps) = general
            .rules
            .iter()
            .enumerate()
            .find_map(|(idx, rule)| rule.source_pattern.captures(content).map(|caps| (idx, rule, caps)))?;

        // d. 更新跨行状态
        if let Some(flag) = &rule.flag {
            self.current_flag.clone_from(flag);
        }
        if rule.until_pattern.is_some() {
            self.active_until = Some(idx);
        }

        let output = render_content(rule, &caps, content);
        let tag = rule.tag.as_deref().unwrap_or("");

        // e. 拼接输出行
        Some(format!(
            "{} {} {} {}",
            prefix,
            pad_with_blank(&self.current_flag, LABEL_WIDTH),
            pad_with_blank(tag, LABEL_WIDTH),
            output
        ))
    }
}

/// 拆分前缀捕获：最后一组（去空白）为内容，其余每组补齐到8位后各跟一个空格
fn split_prefix<'t>(caps: &Captures<'t>) -> (String, &'t str) {
    let last = caps.len() - 1;
    let mut prefix = String::new();
    for idx in 1..last {
        let group = caps.get(idx).map_or("", |m| m.as_str());
        prefix.push_str(&pad_with_blank(group, PREFIX_GROUP_WIDTH));
        prefix.push(' ');
    }
    let content = caps.get(last).map_or("", |m| m.as_str()).trim();
    (prefix, content)
}

/// 有输出模板时：模板 + 全部捕获组（空格分隔）；否则使用行内容
fn render_content<'c>(rule: &GeneralRule, caps: &Captures<'_>, content: &'c str) -> Cow<'c, str> {
    let Some(dest) = &rule.destination_template else {
        return Cow::Borrowed(content);
    };
    let mut rendered = dest.clone();
    for group in caps.iter().skip(1) {
        rendered.push(' ');
        rendered.push_str(group.map_or("", |m| m.as_str()));
    }
    Cow::Owned(rendered)
}
