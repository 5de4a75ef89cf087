use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 任意 JSON 对象（`meta` 以及 LLM 返回的原始映射都用它表示）
pub type JsonMap = Map<String, Value>;

/// 选择题
///
/// `options` 的顺序有语义：正确答案的位置由 `answer_index` 指定。
/// `source_id` 只在被选中后才会设置。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizItem {
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub answer_index: i64,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub meta: JsonMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl Default for QuizItem {
    fn default() -> Self {
        Self {
            question: String::new(),
            options: Vec::new(),
            answer_index: 0,
            explanation: String::new(),
            meta: JsonMap::new(),
            source_id: None,
        }
    }
}

impl QuizItem {
    /// 从 LLM 返回的映射构建题目，缺失或为 null 的字段填充安全默认值
    ///
    /// 这里不做任何校验：空题干、选项数量不对等问题留给启发式检查去发现。
    pub fn from_mapping(mapping: &JsonMap) -> Self {
        let text = |key: &str| -> String {
            match mapping.get(key) {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            }
        };

        let options = mapping
            .get("options")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(option_text).collect())
            .unwrap_or_default();

        let meta = mapping
            .get("meta")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Self {
            question: text("question"),
            options,
            answer_index: mapping
                .get("answer_index")
                .and_then(Value::as_i64)
                .unwrap_or(0),
            explanation: text("explanation"),
            meta,
            source_id: None,
        }
    }

    /// 题目中记录的难度，缺失时视为 3
    pub fn difficulty(&self) -> i64 {
        self.meta
            .get("difficulty")
            .and_then(Value::as_i64)
            .unwrap_or(3)
    }

    /// 答案位置（仅当处于 0..4 时有效）
    pub fn answer_slot(&self) -> Option<usize> {
        usize::try_from(self.answer_index).ok().filter(|slot| *slot < 4)
    }
}

fn option_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
