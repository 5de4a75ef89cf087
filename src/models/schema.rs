//! LLM 返回内容的结构定义与校验

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LlmError, LlmResult};
use crate::models::item::JsonMap;
use crate::models::judge::JudgeVerdict;

/// 出题/改写干扰项两步共用的题目结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSchema {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub answer_index: i64,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<JsonMap>,
}

/// 期望的返回结构
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSchema {
    /// 题目
    Item,
    /// 评审结果
    Judge,
}

impl ResponseSchema {
    pub fn name(self) -> &'static str {
        match self {
            ResponseSchema::Item => "ItemSchema",
            ResponseSchema::Judge => "JudgeSchema",
        }
    }

    /// 按结构校验 JSON，返回规范化后的对象
    ///
    /// 规范化会补齐默认字段并丢弃结构之外的字段。
    pub fn validate(self, value: Value) -> LlmResult<JsonMap> {
        if !value.is_object() {
            return Err(LlmError::NotAnObject);
        }

        let normalized = match self {
            ResponseSchema::Item => serde_json::from_value::<ItemSchema>(value)
                .and_then(serde_json::to_value),
            ResponseSchema::Judge => serde_json::from_value::<JudgeVerdict>(value)
                .and_then(serde_json::to_value),
        }
        .map_err(|source| LlmError::SchemaMismatch {
            schema: self.name(),
            source,
        })?;

        match normalized {
            Value::Object(map) => Ok(map),
            _ => Err(LlmError::NotAnObject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_schema_defaults_options_and_drops_extras() {
        let map = ResponseSchema::Item
            .validate(json!({
                "question": "Q?",
                "answer_index": 1,
                "explanation": "E",
                "confidence": 0.9
            }))
            .unwrap();

        assert_eq!(map["options"], json!([]));
        assert!(map.get("confidence").is_none());
    }

    #[test]
    fn test_item_schema_requires_question() {
        let err = ResponseSchema::Item
            .validate(json!({ "options": ["a", "b", "c", "d"], "answer_index": 0, "explanation": "E" }))
            .unwrap_err();

        assert!(matches!(
            err,
            LlmError::SchemaMismatch {
                schema: "ItemSchema",
                ..
            }
        ));
    }

    #[test]
    fn test_non_object_rejected() {
        let err = ResponseSchema::Judge.validate(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, LlmError::NotAnObject));
    }

    #[test]
    fn test_judge_schema_fills_defaults() {
        let map = ResponseSchema::Judge
            .validate(json!({ "is_unambiguous": true, "is_supported": true, "grammar_ok": false }))
            .unwrap();

        assert_eq!(map["difficulty"], json!(3));
        assert_eq!(map["notes"], json!(""));
    }
}
