//! 候选题处理流程 - 流程层
//!
//! 核心职责：定义"一个候选题"的完整处理流程
//!
//! 流程顺序：
//! 1. 出题 → 改进干扰项
//! 2. 补齐缺省字段
//! 3. 启发式检查
//! 4. LLM 评审
//! 5. 打分

use std::time::Instant;

use tracing::{debug, info};

use crate::clients::JsonCompleter;
use crate::error::LlmResult;
use crate::models::{Chunk, QuizItem, ScoredCandidate};
use crate::services::{heuristic_check, score_candidate, CandidateGenerator, Judge};
use crate::utils::logging::truncate_text;
use crate::workflow::candidate_ctx::CandidateCtx;

/// 候选题处理流程
///
/// - 只处理单个候选，不关心它最终是否被选中
/// - 不持有任何可变状态，可以被多个并发任务共享
pub struct CandidateFlow<'a, C: ?Sized> {
    generator: CandidateGenerator<'a, C>,
    judge: Judge<'a, C>,
    verbose_logging: bool,
}

impl<'a, C: JsonCompleter + ?Sized> CandidateFlow<'a, C> {
    /// 创建新的候选题处理流程
    pub fn new(completer: &'a C, model: &str, temperature: f32) -> Self {
        Self {
            generator: CandidateGenerator::new(completer, model, temperature),
            judge: Judge::new(completer, model, temperature),
            verbose_logging: false,
        }
    }

    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    /// 生成、检查、评审并打分一个候选题
    ///
    /// 任一次外部调用最终失败都会直接返回错误，是否跳过由编排层决定。
    pub async fn run(&self, chunk: &Chunk, ctx: &CandidateCtx) -> LlmResult<ScoredCandidate> {
        let started = Instant::now();

        let mapping = self.generator.generate(&chunk.text).await?;
        let item = QuizItem::from_mapping(&mapping);

        let heuristic = heuristic_check(&item);
        let (judge, item) = self.judge.judge(&chunk.text, &item).await?;
        let elapsed = started.elapsed();

        let score = score_candidate(heuristic.all_ok(), &judge, heuristic.option_similarity_mean);

        info!(
            "{} ✓ 得分 {:.1} | 启发式 {} | 耗时 {:.1}s",
            ctx,
            score,
            if heuristic.all_ok() { "通过" } else { "未通过" },
            elapsed.as_secs_f64()
        );
        if self.verbose_logging {
            self.log_details(ctx, &item);
        }
        debug!(?heuristic, ?judge, "{} 候选详情", ctx);

        Ok(ScoredCandidate {
            seq: ctx.seq,
            item,
            heuristic,
            judge,
            score,
            chunk_id: ctx.chunk_id.clone(),
            elapsed,
        })
    }

    /// 显示题目预览
    fn log_details(&self, ctx: &CandidateCtx, item: &QuizItem) {
        info!("{}   题干: {}", ctx, truncate_text(&item.question, 80));
        for (i, option) in item.options.iter().enumerate() {
            let marker = if i as i64 == item.answer_index { "*" } else { " " };
            info!("{}   {}{}. {}", ctx, marker, i, truncate_text(option, 60));
        }
    }
}
