//! 出题服务 - 业务能力层
//!
//! 两次调用：先根据文本块出一道题，再把整道题交回模型改进干扰项。

use serde_json::Value;
use tracing::{debug, instrument};

use crate::clients::JsonCompleter;
use crate::error::LlmResult;
use crate::models::{JsonMap, ResponseSchema};
use crate::services::prompts::{distractor_prompt, question_prompt};

/// 候选题生成器
pub struct CandidateGenerator<'a, C: ?Sized> {
    completer: &'a C,
    model: String,
    temperature: f32,
}

impl<'a, C: JsonCompleter + ?Sized> CandidateGenerator<'a, C> {
    pub fn new(completer: &'a C, model: impl Into<String>, temperature: f32) -> Self {
        Self {
            completer,
            model: model.into(),
            temperature,
        }
    }

    /// 根据文本块生成一道候选题
    ///
    /// 返回第二步（改进干扰项）的结果，已通过题目结构校验，字段缺省由调用方补齐。
    #[instrument(level = "debug", skip_all, fields(model = %self.model))]
    pub async fn generate(&self, chunk: &str) -> LlmResult<JsonMap> {
        let draft = self
            .completer
            .complete_json(
                &question_prompt(chunk),
                &self.model,
                self.temperature,
                ResponseSchema::Item,
            )
            .await?;

        let draft_json = Value::Object(draft).to_string();
        debug!("初稿: {}", draft_json);

        self.completer
            .complete_json(
                &distractor_prompt(&draft_json),
                &self.model,
                self.temperature,
                ResponseSchema::Item,
            )
            .await
    }
}
