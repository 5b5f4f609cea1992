//! 值树 + 结构化文本解析 + JSON 值树构建
mod json;
mod parser;
mod value;

pub use json::{record_from_json, record_from_json_slice, record_from_json_str};
pub use parser::MarkupParser;
pub use value::{Item, Record, Value};
