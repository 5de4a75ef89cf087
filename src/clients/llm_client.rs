//! LLM API 客户端
//!
//! 封装"发一次请求，拿回一个符合结构的 JSON 对象"这一能力。
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 兼容 OpenAI API 的服务（如 Groq 等）

use std::sync::OnceLock;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::{LlmError, LlmResult};
use crate::models::{JsonMap, ResponseSchema};
use crate::utils::logging::truncate_text;

/// 返回结构化 JSON 的补全能力
///
/// 流水线只依赖这个 trait，测试时注入确定性的桩实现。
#[async_trait]
pub trait JsonCompleter: Send + Sync {
    /// 发送提示词，返回符合 `schema` 的 JSON 对象
    async fn complete_json(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
        schema: ResponseSchema,
    ) -> LlmResult<JsonMap>;
}

#[async_trait]
impl<T: JsonCompleter + ?Sized> JsonCompleter for Box<T> {
    async fn complete_json(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
        schema: ResponseSchema,
    ) -> LlmResult<JsonMap> {
        (**self)
            .complete_json(prompt, model, temperature, schema)
            .await
    }
}

/// 单次调用的 OpenAI 兼容客户端（不重试）
pub struct OpenAiCompleter {
    client: Client<OpenAIConfig>,
}

impl OpenAiCompleter {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.llm_api_key)
            .with_api_base(&config.llm_api_base_url);

        Self {
            client: Client::with_config(openai_config),
        }
    }

    async fn chat(&self, prompt: &str, model: &str, temperature: f32) -> LlmResult<String> {
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|e| LlmError::api_failed(model, e))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(model)
            .messages(vec![ChatCompletionRequestMessage::User(user_msg)])
            .temperature(temperature)
            .build()
            .map_err(|e| LlmError::api_failed(model, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            LlmError::api_failed(model, e)
        })?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| LlmError::EmptyContent {
                model: model.to_string(),
            })
    }
}

#[async_trait]
impl JsonCompleter for OpenAiCompleter {
    #[instrument(level = "debug", skip(self, prompt), fields(schema = schema.name()))]
    async fn complete_json(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
        schema: ResponseSchema,
    ) -> LlmResult<JsonMap> {
        debug!("用户消息长度: {} 字符", prompt.len());

        let text = self.chat(prompt, model, temperature).await?;
        let value = parse_json_response(&text)?;
        schema.validate(value)
    }
}

/// 解析模型的文本输出为 JSON
pub fn parse_json_response(text: &str) -> LlmResult<Value> {
    let json_text = extract_json_block(text);
    serde_json::from_str(&json_text).map_err(|source| LlmError::JsonParseFailed {
        response: truncate_text(text, 200),
        source,
    })
}

/// 去掉 markdown 代码块标记和首尾空白
fn strip_code_fences(text: &str) -> String {
    static OPEN_FENCE: OnceLock<Regex> = OnceLock::new();
    static CLOSE_FENCE: OnceLock<Regex> = OnceLock::new();

    let open = OPEN_FENCE.get_or_init(|| Regex::new(r"^```[a-zA-Z]*\n").expect("valid regex"));
    let close = CLOSE_FENCE.get_or_init(|| Regex::new(r"\n```$").expect("valid regex"));

    let text = text.trim();
    let text = open.replace(text, "");
    let text = close.replace(&text, "");
    text.trim().to_string()
}

/// 尽力从模型输出中取出 JSON 对象文本
///
/// 能直接解析就原样返回，否则截取第一个 `{` 到最后一个 `}` 之间的内容。
pub fn extract_json_block(text: &str) -> String {
    let text = strip_code_fences(text);
    if serde_json::from_str::<Value>(&text).is_ok() {
        return text;
    }

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => text[start..=end].to_string(),
        _ => text,
    }
}
