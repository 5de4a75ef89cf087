use serde::{Deserialize, Serialize};

/// 评审结果
///
/// `difficulty` 缺失或不是合法整数时为 3，`notes` 缺失时为空字符串。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    pub is_unambiguous: bool,
    pub is_supported: bool,
    pub grammar_ok: bool,
    #[serde(default = "default_difficulty", deserialize_with = "deserialize_difficulty")]
    pub difficulty: i64,
    #[serde(default, deserialize_with = "deserialize_notes")]
    pub notes: String,
}

/// 默认难度
pub const DEFAULT_DIFFICULTY: i64 = 3;

fn default_difficulty() -> i64 {
    DEFAULT_DIFFICULTY
}

// 难度可能是整数、数字字符串、浮点数甚至 null，只认整数
fn deserialize_difficulty<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct DifficultyVisitor;

    impl<'de> Visitor<'de> for DifficultyVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer difficulty")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(i64::try_from(value).unwrap_or(DEFAULT_DIFFICULTY))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            // 只接受整数值的浮点数，如 4.0
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
                Ok(value as i64)
            } else {
                Ok(DEFAULT_DIFFICULTY)
            }
        }

        fn visit_bool<E>(self, _value: bool) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(DEFAULT_DIFFICULTY)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.trim().parse().unwrap_or(DEFAULT_DIFFICULTY))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(DEFAULT_DIFFICULTY)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(DEFAULT_DIFFICULTY)
        }
    }

    deserializer.deserialize_any(DifficultyVisitor)
}

fn deserialize_notes<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct NotesVisitor;

    impl<'de> Visitor<'de> for NotesVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(NotesVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let verdict: JudgeVerdict = serde_json::from_value(json!({
            "is_unambiguous": true,
            "is_supported": false,
            "grammar_ok": true
        }))
        .unwrap();

        assert_eq!(verdict.difficulty, 3);
        assert_eq!(verdict.notes, "");
    }

    #[test]
    fn test_invalid_difficulty_coerced_to_default() {
        for raw in [json!(null), json!("hard"), json!(2.5), json!(false)] {
            let verdict: JudgeVerdict = serde_json::from_value(json!({
                "is_unambiguous": true,
                "is_supported": true,
                "grammar_ok": true,
                "difficulty": raw,
                "notes": null
            }))
            .unwrap();
            assert_eq!(verdict.difficulty, 3);
            assert_eq!(verdict.notes, "");
        }
    }

    #[test]
    fn test_integral_float_difficulty_accepted() {
        let verdict: JudgeVerdict = serde_json::from_value(json!({
            "is_unambiguous": true,
            "is_supported": true,
            "grammar_ok": true,
            "difficulty": 4.0
        }))
        .unwrap();

        assert_eq!(verdict.difficulty, 4);
    }

    #[test]
    fn test_numeric_string_difficulty_accepted() {
        let verdict: JudgeVerdict = serde_json::from_value(json!({
            "is_unambiguous": true,
            "is_supported": true,
            "grammar_ok": true,
            "difficulty": "5",
            "notes": "recall only"
        }))
        .unwrap();

        assert_eq!(verdict.difficulty, 5);
        assert_eq!(verdict.notes, "recall only");
    }

    #[test]
    fn test_missing_boolean_is_rejected() {
        let result: Result<JudgeVerdict, _> = serde_json::from_value(json!({
            "is_unambiguous": true,
            "grammar_ok": true
        }));
        assert!(result.is_err());
    }
}
