//! JSON 配置 → 值树
//! 与 markup 解析器产出同一种 Record，编译器只依赖值树
use serde_json::Value as JsonValue;

use super::value::{Item, Record, Value};
use crate::error::{CoreError, CoreResult};

/// 从 JSON 文本构建值树
pub fn record_from_json_str(text: &str) -> CoreResult<Record> {
    let doc: JsonValue = serde_json::from_str(text)?;
    record_from_json(&doc)
}

/// 从 JSON 字节构建值树
pub fn record_from_json_slice(bytes: &[u8]) -> CoreResult<Record> {
    let doc: JsonValue = serde_json::from_slice(bytes)?;
    record_from_json(&doc)
}

/// 从已解码的 JSON 文档构建值树
/// 规则：
/// 1. 根必须是对象
/// 2. 字段上的数字/布尔转为文本，null 字段省略
/// 3. 数组元素只能是标量或扁平对象，不支持嵌套数组
/// 4. 数组里的非字符串标量（含 null）保留为 Item::Scalar，下标不变
pub fn record_from_json(doc: &JsonValue) -> CoreResult<Record> {
    let JsonValue::Object(map) = doc else {
        return Err(CoreError::Parse("JSON config root must be an object".to_string()));
    };

    let mut record = Record::new();
    for (key, value) in map {
        match value {
            JsonValue::Null => continue,
            JsonValue::Array(items) => {
                let items = items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| array_item(key, idx, item))
                    .collect::<CoreResult<Vec<_>>>()?;
                record.insert(key.as_str(), Value::Array(items));
            }
            JsonValue::Object(_) => {
                return Err(CoreError::Parse(format!(
                    "JSON field '{}' is an object, only strings and arrays are supported",
                    key
                )));
            }
            scalar => {
                // 标量分支里 scalar_text 必有值
                if let Some(text) = scalar_text(scalar) {
                    record.insert(key.as_str(), Value::String(text));
                }
            }
        }
    }
    Ok(record)
}

fn array_item(key: &str, idx: usize, item: &JsonValue) -> CoreResult<Item> {
    match item {
        JsonValue::Object(fields) => {
            let mut nested = Record::new();
            for (field, value) in fields {
                match value {
                    JsonValue::Null => {}
                    JsonValue::Array(_) | JsonValue::Object(_) => {
                        return Err(CoreError::Parse(format!(
                            "JSON field '{}[{}].{}' is nested, array items must be flat",
                            key, idx, field
                        )));
                    }
                    scalar => {
                        if let Some(text) = scalar_text(scalar) {
                            nested.insert(field.as_str(), Value::String(text));
                        }
                    }
                }
            }
            Ok(Item::Record(nested))
        }
        JsonValue::Array(_) => Err(CoreError::Parse(format!(
            "JSON field '{}[{}]' is a nested array, which is not supported",
            key, idx
        ))),
        JsonValue::String(s) => Ok(Item::String(s.clone())),
        scalar => Ok(Item::Scalar(scalar.clone())),
    }
}

#[inline(always)]
fn scalar_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::MarkupParser;

    #[test]
    fn test_json_matches_markup_tree() {
        let json = r#"{
            "type": "general",
            "prefix": "^(\\d+)",
            "rules": [
                {"src": "^BEGIN", "until": "^END", "flag": "B"},
                {"src": "^ERROR (.*)", "dest": "ERR", "tag": "E"}
            ]
        }"#;
        let markup = "type:general\nprefix:^(\\d+)\nrules:\n[\nsrc:^BEGIN\nuntil:^END\nflag:B\n-\nsrc:^ERROR (.*)\ndest:ERR\ntag:E\n]";

        assert_eq!(record_from_json_str(json).unwrap(), MarkupParser::parse_str(markup));
    }

    #[test]
    fn test_field_scalars_become_text_and_null_fields_are_dropped() {
        let record = record_from_json_str(r#"{"a": 1, "b": true, "c": null}"#).unwrap();
        assert_eq!(record.get_str("a"), Some("1"));
        assert_eq!(record.get_str("b"), Some("true"));
        assert!(!record.contains_key("c"));
    }

    #[test]
    fn test_array_scalars_keep_their_shape_and_index() {
        let record = record_from_json_str(r#"{"rules": [2, null, "x", false]}"#).unwrap();
        assert_eq!(
            record.get("rules"),
            Some(&Value::Array(vec![
                Item::Scalar(JsonValue::from(2)),
                Item::Scalar(JsonValue::Null),
                Item::String("x".into()),
                Item::Scalar(JsonValue::Bool(false)),
            ]))
        );
        // 导出时仍是原始 JSON 形态
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"rules":[2,null,"x",false]}"#
        );
    }

    #[test]
    fn test_unsupported_shapes_are_rejected() {
        // 测试场景：根不是对象 / 嵌套数组 / 顶层对象字段
        assert!(matches!(record_from_json_str("[1]"), Err(CoreError::Parse(_))));
        assert!(matches!(record_from_json_str(r#"{"rules": [[1]]}"#), Err(CoreError::Parse(_))));
        assert!(matches!(record_from_json_str(r#"{"x": {"y": 1}}"#), Err(CoreError::Parse(_))));
        assert!(matches!(
            record_from_json_str(r#"{"rules": [{"src": ["a"]}]}"#),
            Err(CoreError::Parse(ref msg)) if msg.contains("rules[0].src")
        ));
    }

    #[test]
    fn test_json_syntax_error() {
        assert!(matches!(record_from_json_str("{"), Err(CoreError::Json(_))));
    }
}
