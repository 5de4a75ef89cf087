//! 按脚本返回结果的补全实现
//!
//! 用于测试和离线调试：按结构（题目/评审）分别排队预设的响应，
//! 预设响应同样经过结构校验，行为与真实客户端一致。

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use crate::clients::llm_client::JsonCompleter;
use crate::error::{LlmError, LlmResult};
use crate::models::{JsonMap, ResponseSchema};

/// 记录下来的一次调用
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub schema: ResponseSchema,
}

enum Scripted {
    Value(Value),
    Failure(LlmError),
}

/// 脚本化补全
#[derive(Default)]
pub struct ScriptedCompleter {
    items: Mutex<VecDeque<Scripted>>,
    judges: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<RecordedCall>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一条题目响应（出题和改写干扰项都从这里取）
    pub fn push_item(self, value: Value) -> Self {
        lock(&self.items).push_back(Scripted::Value(value));
        self
    }

    /// 追加一条评审响应
    pub fn push_judge(self, value: Value) -> Self {
        lock(&self.judges).push_back(Scripted::Value(value));
        self
    }

    /// 追加一次失败
    pub fn push_failure(self, schema: ResponseSchema, error: LlmError) -> Self {
        lock(self.queue(schema)).push_back(Scripted::Failure(error));
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    fn queue(&self, schema: ResponseSchema) -> &Mutex<VecDeque<Scripted>> {
        match schema {
            ResponseSchema::Item => &self.items,
            ResponseSchema::Judge => &self.judges,
        }
    }
}

#[async_trait]
impl JsonCompleter for ScriptedCompleter {
    async fn complete_json(
        &self,
        prompt: &str,
        model: &str,
        temperature: f32,
        schema: ResponseSchema,
    ) -> LlmResult<JsonMap> {
        lock(&self.calls).push(RecordedCall {
            prompt: prompt.to_string(),
            model: model.to_string(),
            temperature,
            schema,
        });

        let next = lock(self.queue(schema)).pop_front();
        match next {
            Some(Scripted::Value(value)) => schema.validate(value),
            Some(Scripted::Failure(error)) => Err(error),
            None => Err(LlmError::EmptyContent {
                model: model.to_string(),
            }),
        }
    }
}
