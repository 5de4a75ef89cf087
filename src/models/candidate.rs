use std::time::Duration;

use serde::Serialize;

use crate::models::{JudgeVerdict, QuizItem};

/// 启发式检查结果
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeuristicResult {
    /// 恰好 4 个选项
    pub height_ok: bool,
    /// 答案下标在 [0, 4)
    pub answer_ok: bool,
    /// 题干和解析长度都在范围内
    pub length_ok: bool,
    /// 没有近似重复的选项
    pub unique_ok: bool,
    /// 所有选项两两相似度的平均值
    pub option_similarity_mean: f64,
}

impl HeuristicResult {
    pub fn all_ok(&self) -> bool {
        self.height_ok && self.answer_ok && self.length_ok && self.unique_ok
    }
}

/// 打过分的候选题
///
/// 每次生成尝试产生一条，之后不再修改。`seq` 是调度时分配的生成序号，
/// 用于同分时保持生成顺序。
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub seq: usize,
    pub item: QuizItem,
    pub heuristic: HeuristicResult,
    pub judge: JudgeVerdict,
    pub score: f64,
    pub chunk_id: String,
    /// 生成 + 评审耗时
    pub elapsed: Duration,
}
