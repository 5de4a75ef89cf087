//! 重试装饰器
//!
//! 包在任意 [`JsonCompleter`] 外面，为每次尝试加超时，失败后按
//! `backoff_step * attempt` 线性退避。所有尝试都失败时只返回一个终止错误。

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::clients::llm_client::JsonCompleter;
use crate::error::{LlmError, LlmResult};
use crate::models::{JsonMap, ResponseSchema};

/// 默认退避步长
pub const DEFAULT_BACKOFF_STEP: Duration = Duration::from_millis(600);

/// 带超时与重试的补全能力
pub struct RetryingCompleter<C> {
    inner: C,
    max_retries: u32,
    timeout: Duration,
    backoff_step: Duration,
}

impl<C: JsonCompleter> RetryingCompleter<C> {
    /// # 参数
    /// - `inner`: 单次调用的实现
    /// - `max_retries`: 最大尝试次数（至少 1 次）
    /// - `timeout_sec`: 单次尝试的超时时间
    pub fn new(inner: C, max_retries: u32, timeout_sec: f64) -> Self {
        Self {
            inner,
            max_retries: max_retries.max(1),
            timeout: Duration::try_from_secs_f64(timeout_sec).unwrap_or(Duration::from_secs(60)),
            backoff_step: DEFAULT_BACKOFF_STEP,
        }
    }

    pub fn with_backoff_step(mut self, step: Duration) -> Self {
        self.backoff_step = step;
        self
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

#[async_trait]
impl<C: JsonCompleter> JsonCompleter for RetryingCompleter<C> {
    async fn complete_json(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
        schema: ResponseSchema,
    ) -> LlmResult<JsonMap> {
        let mut attempt = 1;
        loop {
            let result = match tokio::time::timeout(
                self.timeout,
                self.inner.complete_json(prompt, model, temperature, schema),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(LlmError::Timeout {
                    timeout_sec: self.timeout.as_secs_f64(),
                }),
            };

            match result {
                Ok(map) => return Ok(map),
                Err(e) if attempt < self.max_retries => {
                    warn!(
                        "⚠️ {} 调用失败 (第 {}/{} 次): {}，稍后重试",
                        schema.name(),
                        attempt,
                        self.max_retries,
                        e
                    );
                    tokio::time::sleep(self.backoff_step * attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    return Err(LlmError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    })
                }
            }
        }
    }
}
