use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::ConfigError;

/// 规则集类型，决定每一行使用的匹配算法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum RuleSetKind {
    /// 包含任意规则字符串即保留
    #[serde(rename = "stringlist")]
    StringList,
    /// 不包含任何规则字符串才保留
    #[serde(rename = "stringlist_notcontainany")]
    StringListExclude,
    /// 匹配任意规则正则即保留
    #[default]
    #[serde(rename = "regexlist")]
    RegexList,
    /// 不匹配任何规则正则才保留
    #[serde(rename = "regexlist_notmatchany")]
    RegexListExclude,
    /// 前缀提取 + 有序规则 + 标记/跳过区间
    #[serde(rename = "general")]
    General,
}

impl RuleSetKind {
    /// 全部受支持类型（配置中的写法）
    pub const ALL: [RuleSetKind; 5] = [
        RuleSetKind::StringList,
        RuleSetKind::StringListExclude,
        RuleSetKind::RegexList,
        RuleSetKind::RegexListExclude,
        RuleSetKind::General,
    ];

    /// 配置文件中的类型名称
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleSetKind::StringList => "stringlist",
            RuleSetKind::StringListExclude => "stringlist_notcontainany",
            RuleSetKind::RegexList => "regexlist",
            RuleSetKind::RegexListExclude => "regexlist_notmatchany",
            RuleSetKind::General => "general",
        }
    }

    /// 是否为取反（排除）类型
    #[inline(always)]
    pub fn is_exclude(&self) -> bool {
        matches!(self, RuleSetKind::StringListExclude | RuleSetKind::RegexListExclude)
    }
}

impl Display for RuleSetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleSetKind {
    type Err = ConfigError;

    /// 大小写敏感的精确匹配
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnsupportedKind(s.to_string()))
    }
}
