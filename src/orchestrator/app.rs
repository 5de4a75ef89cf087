//! 应用外壳 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：校验配置、输出启动信息、组装带重试的 LLM 客户端
//! 2. **运行**：读取文档 → 流水线出题 → 写出 JSONL
//! 3. **全局统计**：输出最终指标和输出路径
//!
//! 只有本模块持有 LLM 客户端，下层只借用它。

use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::clients::{JsonCompleter, OpenAiCompleter, RetryingCompleter};
use crate::config::Config;
use crate::models::{load_document, write_jsonl};
use crate::orchestrator::pipeline::{build_quiz, PipelineOptions, RunReport};
use crate::utils::logging::{log_startup, print_final_stats};

/// 应用主结构
pub struct App<C = RetryingCompleter<OpenAiCompleter>> {
    config: Config,
    completer: C,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        config.validate().context("配置无效")?;

        log_startup(&config);

        let completer = RetryingCompleter::new(
            OpenAiCompleter::new(&config),
            config.max_retries,
            config.request_timeout_sec,
        );

        Ok(Self { config, completer })
    }
}

impl<C: JsonCompleter> App<C> {
    /// 使用指定的补全能力创建应用（测试中注入桩实现）
    pub fn with_completer(config: Config, completer: C) -> Self {
        Self { config, completer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 运行应用主逻辑
    ///
    /// # 参数
    /// - `input`: 输入文档路径
    /// - `output`: 输出 JSONL 路径（父目录不存在时自动创建）
    pub async fn run(&self, input: &Path, output: &Path) -> Result<RunReport> {
        let text = load_document(input)
            .await
            .with_context(|| format!("无法读取输入文档: {}", input.display()))?;

        if text.trim().is_empty() {
            warn!("⚠️ 输入文档为空: {}", input.display());
        }

        let options = PipelineOptions::from(&self.config);
        let report = build_quiz(&self.completer, &text, &options)
            .await
            .context("出题流水线失败")?;

        write_jsonl(output, &report.items)
            .await
            .with_context(|| format!("无法写入输出文件: {}", output.display()))?;

        print_final_stats(&report, output);

        Ok(report)
    }
}
