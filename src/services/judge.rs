//! 评审服务 - 业务能力层
//!
//! 让模型再看一遍原文和题目，判断是否无歧义、有依据、语法正确，并估计难度。

use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::clients::JsonCompleter;
use crate::error::{LlmError, LlmResult};
use crate::models::{JudgeVerdict, QuizItem, ResponseSchema};
use crate::services::prompts::judge_prompt;

/// 评审器
pub struct Judge<'a, C: ?Sized> {
    completer: &'a C,
    model: String,
    temperature: f32,
}

impl<'a, C: JsonCompleter + ?Sized> Judge<'a, C> {
    pub fn new(completer: &'a C, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            completer,
            model: model.into(),
            temperature,
        }
    }

    /// 评审一道题
    ///
    /// # 返回
    /// 评审结果，以及写入了 `difficulty` / `judge_notes` 的新题目（原题不变）
    #[instrument(level = "debug", skip_all, fields(model = %self.model))]
    pub async fn judge(&self, passage: &str, item: &QuizItem) -> LlmResult<(JudgeVerdict, QuizItem)> {
        let item_text = item_json(item)?;

        let map = self
            .completer
            .complete_json(
                &judge_prompt(passage, &item_text),
                &self.model,
                self.temperature,
                ResponseSchema::Judge,
            )
            .await?;

        let verdict: JudgeVerdict =
            serde_json::from_value(Value::Object(map)).map_err(|source| LlmError::SchemaMismatch {
                schema: ResponseSchema::Judge.name(),
                source,
            })?;

        debug!(
            "评审结果: 无歧义={} 有依据={} 语法={} 难度={}",
            verdict.is_unambiguous, verdict.is_supported, verdict.grammar_ok, verdict.difficulty
        );

        let updated = apply_verdict(item, &verdict);
        Ok((verdict, updated))
    }
}

/// 题目的紧凑 JSON 文本，用于嵌入评审提示词
fn item_json(item: &QuizItem) -> LlmResult<String> {
    serde_json::to_string(item).map_err(|source| LlmError::ItemSerializeFailed { source })
}

/// 把评审结果写进题目的 `meta`，返回新题目
pub fn apply_verdict(item: &QuizItem, verdict: &JudgeVerdict) -> QuizItem {
    let mut updated = item.clone();
    updated
        .meta
        .insert("difficulty".to_string(), json!(verdict.difficulty));
    updated
        .meta
        .insert("judge_notes".to_string(), json!(verdict.notes));
    updated
}
