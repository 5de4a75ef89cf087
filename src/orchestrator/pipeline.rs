//! 出题流水线 - 编排层
//!
//! ## 职责
//!
//! 1. **切分文档**：按目标长度切成文本块
//! 2. **调度候选**：每个文本块生成 `max_candidates_per_chunk` 个候选，
//!    最多 `max_concurrent_requests` 个同时进行
//! 3. **汇总候选池**：按调度顺序收集结果（与完成顺序无关）
//! 4. **选题和统计**：交给 selector 选题，计算运行指标
//!
//! ## 失败处理
//!
//! 默认任何一个候选最终失败都会终止整次运行；
//! 开启 `skip_failed_candidates` 后只记录警告并跳过该候选。

use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use crate::clients::JsonCompleter;
use crate::config::Config;
use crate::error::LlmResult;
use crate::models::{Chunk, QuizItem, ScoredCandidate};
use crate::orchestrator::metrics::RunMetrics;
use crate::services::selector::ANSWER_SLOTS;
use crate::services::{chunk_document, select_items};
use crate::utils::logging::{log_chunk_start, log_chunks_loaded};
use crate::workflow::{CandidateCtx, CandidateFlow};

/// 流水线参数
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub model: String,
    pub temperature: f32,
    pub target_count: usize,
    pub max_candidates_per_chunk: usize,
    pub target_chars: usize,
    pub doc_id: String,
    pub max_concurrent_requests: usize,
    pub skip_failed_candidates: bool,
    pub verbose_logging: bool,
}

impl From<&Config> for PipelineOptions {
    fn from(config: &Config) -> Self {
        Self {
            model: config.llm_model_name.clone(),
            temperature: config.temperature,
            target_count: config.target_item_count,
            max_candidates_per_chunk: config.max_candidates_per_chunk,
            target_chars: config.target_chars,
            doc_id: config.doc_id.clone(),
            max_concurrent_requests: config.max_concurrent_requests,
            skip_failed_candidates: config.skip_failed_candidates,
            verbose_logging: config.verbose_logging,
        }
    }
}

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct RunReport {
    /// 选中的题目（可能少于目标数量）
    pub items: Vec<QuizItem>,
    pub metrics: RunMetrics,
    /// 成功打分的候选数
    pub candidate_count: usize,
    /// 被跳过的候选数（仅在开启跳过时可能非零）
    pub skipped_count: usize,
    pub chunk_count: usize,
    pub position_counts: [usize; ANSWER_SLOTS],
}

/// 从一段文本生成题目
///
/// # 参数
/// - `completer`: JSON 补全能力（真实客户端或测试桩）
/// - `text`: 原始文档
/// - `options`: 流水线参数
///
/// # 返回
/// 选中的题目和运行指标；默认模式下第一个失败的候选会作为错误返回
pub async fn build_quiz<C>(completer: &C, text: &str, options: &PipelineOptions) -> LlmResult<RunReport>
where
    C: JsonCompleter + ?Sized,
{
    let started = Instant::now();

    let chunks = chunk_document(&options.doc_id, text, options.target_chars);
    log_chunks_loaded(chunks.len(), options.max_candidates_per_chunk, options.target_count);
    info!(
        num_chunks = chunks.len(),
        target_items = options.target_count,
        model = %options.model,
        temperature = options.temperature,
        "run metadata"
    );

    let flow = CandidateFlow::new(completer, &options.model, options.temperature)
        .with_verbose_logging(options.verbose_logging);
    let units = schedule_units(&chunks, options.max_candidates_per_chunk);
    let total_chunks = chunks.len();

    let (pool, skipped_count) = collect_pool(
        &flow,
        units,
        total_chunks,
        options.max_concurrent_requests,
        options.skip_failed_candidates,
    )
    .await?;

    let selection = select_items(&pool, options.target_count);
    let metrics = RunMetrics::compute(
        &pool,
        &selection.position_counts,
        selection.items.len(),
        started.elapsed(),
    );

    info!(
        candidates = pool.len(),
        skipped = skipped_count,
        selected = selection.items.len(),
        valid_rate = metrics.valid_rate,
        avg_difficulty = metrics.avg_difficulty,
        option_similarity_mean = metrics.option_similarity_mean,
        position_bias_entropy = metrics.position_bias_entropy,
        time_per_item = metrics.time_per_item,
        "run metrics"
    );
    if selection.items.len() < options.target_count {
        warn!(
            "⚠️ 候选不足: 目标 {} 道，实际选出 {} 道",
            options.target_count,
            selection.items.len()
        );
    }

    Ok(RunReport {
        items: selection.items,
        metrics,
        candidate_count: pool.len(),
        skipped_count,
        chunk_count: total_chunks,
        position_counts: selection.position_counts,
    })
}

/// 运行所有候选，按调度顺序（而不是完成顺序）收集结果
///
/// # 返回
/// 候选池（按 `seq` 升序）和被跳过的候选数
async fn collect_pool<C>(
    flow: &CandidateFlow<'_, C>,
    units: Vec<(CandidateCtx, &Chunk)>,
    total_chunks: usize,
    max_concurrent_requests: usize,
    skip_failed_candidates: bool,
) -> LlmResult<(Vec<ScoredCandidate>, usize)>
where
    C: JsonCompleter + ?Sized,
{
    let mut results = stream::iter(units)
        .map(|(ctx, chunk)| async move {
            if ctx.attempt == 1 {
                log_chunk_start(chunk, total_chunks);
            }
            let result = flow.run(chunk, &ctx).await;
            (ctx, result)
        })
        .buffered(max_concurrent_requests.max(1));

    let mut pool = Vec::new();
    let mut skipped_count = 0;
    while let Some((ctx, result)) = results.next().await {
        match result {
            Ok(candidate) => pool.push(candidate),
            Err(e) if skip_failed_candidates => {
                warn!("{} ⚠️ 候选生成失败，已跳过: {}", ctx, e);
                skipped_count += 1;
            }
            Err(e) => {
                error!("{} ❌ 候选生成失败，终止运行: {}", ctx, e);
                return Err(e);
            }
        }
    }

    Ok((pool, skipped_count))
}

/// 为每个 (文本块, 尝试) 分配生成序号，顺序为块优先
fn schedule_units(chunks: &[Chunk], attempts_per_chunk: usize) -> Vec<(CandidateCtx, &Chunk)> {
    chunks
        .iter()
        .flat_map(|chunk| (1..=attempts_per_chunk).map(move |attempt| (chunk, attempt)))
        .enumerate()
        .map(|(seq, (chunk, attempt))| {
            (CandidateCtx::new(seq, chunk, attempt, attempts_per_chunk), chunk)
        })
        .collect()
}
