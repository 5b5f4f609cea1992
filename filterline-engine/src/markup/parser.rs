//! 结构化文本（markup）解析器
//! 无缩进、单遍扫描，仅保留一行的回看状态：
//! ```text
//! type:general
//! prefix:^(\d+:\d+:\d+)
//! rules:
//! [
//!     src:^BEGIN
//!     until:^END
//!     flag:B
//!     -
//!     src:^ERROR (.*)
//!     dest:ERR
//!     tag:E
//! ]
//! ```
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use super::value::{Item, Record, Value};
use crate::error::{CoreError, CoreResult};
use crate::utils::preview::short_preview;

const ARRAY_OPEN: &str = "[";
const ARRAY_CLOSE: &str = "]";
const ITEM_SEPARATOR: &str = "-";
const COMMENT_PREFIX: char = '#';
const KV_SEPARATOR: char = ':';

/// 结构化文本解析器
/// 逐行喂入（feed_line），结束后取出值树（finish）
#[derive(Debug, Default)]
pub struct MarkupParser {
    /// 顶层记录
    value: Record,
    /// 是否处于数组模式
    array_mode: bool,
    /// 正在构建的数组元素；出现裸字符串元素后置为 None
    pending_item: Option<Record>,
    /// 当前数组对应的键
    array_key: String,
    /// 最近一次出现的键（顶层或数组元素内）
    last_key: String,
    /// 上一个有效行是否为键值行
    last_line_keyed: bool,
}

impl MarkupParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 解析惰性行序列（不可重启，重新解析需提供新的行源）
    pub fn parse_lines<I, S>(lines: I) -> CoreResult<Record>
    where
        I: IntoIterator<Item = io::Result<S>>,
        S: AsRef<str>,
    {
        let mut parser = Self::new();
        for line in lines {
            parser.feed_line(line?.as_ref());
        }
        Ok(parser.finish())
    }

    /// 从任意 BufRead 解析
    pub fn parse_reader<R: BufRead>(reader: R) -> CoreResult<Record> {
        Self::parse_lines(reader.lines())
    }

    /// 从内存文本解析（不会失败）
    pub fn parse_str(text: &str) -> Record {
        let mut parser = Self::new();
        text.lines().for_each(|line| parser.feed_line(line));
        parser.finish()
    }

    /// 从文件解析
    /// 文件不存在返回 Parse 错误，其余读取失败返回 Io 错误
    pub fn parse_file(path: impl AsRef<Path>) -> CoreResult<Record> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CoreError::Parse(format!("file not exist: {}", path.display())));
        }
        let file = File::open(path)?;
        log::debug!("Parsing markup config {}", path.display());
        Self::parse_reader(BufReader::new(file))
    }

    /// 处理单行
    pub fn feed_line(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIX) {
            return;
        }

        match trimmed {
            ARRAY_OPEN => self.open_array(),
            ITEM_SEPARATOR => self.close_item(),
            ARRAY_CLOSE => {
                self.close_item();
                self.array_key.clear();
                self.array_mode = false;
            }
            _ => {
                self.feed_entry(trimmed);
                return;
            }
        }
        self.last_line_keyed = false;
    }

    /// 结束解析，返回值树
    pub fn finish(self) -> Record {
        if self.array_mode {
            log::debug!("Markup input ended inside array '{}'", self.array_key);
        }
        self.value
    }

    fn open_array(&mut self) {
        // 数组键取 last_key，可能是过期的键，这里只告警不修正
        if !self.last_line_keyed {
            log::warn!(
                "'[' is not preceded by a keyed line, array is keyed by last key '{}'",
                self.last_key
            );
        }
        self.array_mode = true;
        self.array_key = self.last_key.clone();
        self.pending_item = Some(Record::new());
        self.value.insert(self.array_key.clone(), Value::Array(Vec::new()));
    }

    /// 结束当前数组元素：非空才入数组
    fn close_item(&mut self) {
        if self.array_key.is_empty() {
            return;
        }
        let Some(item) = self.pending_item.take() else {
            return;
        };
        if item.is_empty() {
            self.pending_item = Some(item);
            return;
        }
        if let Some(array) = self.active_array() {
            array.push(Item::Record(item));
        }
        self.pending_item = Some(Record::new());
    }

    fn feed_entry(&mut self, trimmed: &str) {
        let Some((key, value)) = trimmed.split_once(KV_SEPARATOR) else {
            self.last_line_keyed = false;
            if self.array_mode {
                // 裸字符串元素，丢弃正在构建的记录元素
                self.pending_item = None;
                if let Some(array) = self.active_array() {
                    array.push(Item::String(trimmed.to_string()));
                }
            } else {
                log::debug!("Skip line without key: {}", short_preview(trimmed, 80));
            }
            return;
        };

        let (key, value) = (key.trim(), value.trim());
        if self.array_mode {
            match self.pending_item.as_mut() {
                Some(item) => item.insert(key, Value::from(value)),
                None => log::warn!(
                    "Skip '{}' in array '{}': array already holds bare string items",
                    key,
                    self.array_key
                ),
            }
        } else {
            self.value.insert(key, Value::from(value));
        }

        self.last_key = key.to_string();
        self.last_line_keyed = true;
    }

    fn active_array(&mut self) -> Option<&mut Vec<Item>> {
        match self.value.get_mut(&self.array_key) {
            Some(Value::Array(array)) => Some(array),
            _ => None,
        }
    }
}
