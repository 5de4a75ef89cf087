//! # quizgen
//!
//! 从一篇文本自动生成四选一阅读理解题的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Clients）
//! - `clients/` - 持有 LLM 连接，只暴露"返回一个 JSON 对象"的能力
//! - `JsonCompleter` - 补全能力抽象，测试中用 `ScriptedCompleter` 替换（`testing` feature）
//! - `RetryingCompleter` - 超时 + 重试装饰器
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，彼此独立
//! - `chunker` - 文档切分
//! - `CandidateGenerator` - 出题 + 改进干扰项
//! - `heuristics` / `Judge` / `scorer` - 检查、评审、打分
//! - `selector` - 按答案位置均衡选题
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个候选题"的完整处理流程
//! - `CandidateCtx` - 上下文封装（chunk_id + 尝试序号 + 生成序号）
//! - `CandidateFlow` - 流程编排（generate → check → judge → score）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/pipeline` - 调度所有候选、选题、计算指标
//! - `orchestrator/app` - 应用外壳，负责输入输出
//!
//! ## 模块结构

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{JsonCompleter, OpenAiCompleter, RetryingCompleter};
pub use config::Config;
pub use error::{AppError, AppResult, LlmError, LlmResult};
pub use models::{Chunk, QuizItem};
pub use orchestrator::{build_quiz, App, PipelineOptions, RunMetrics, RunReport};
pub use workflow::{CandidateCtx, CandidateFlow};
