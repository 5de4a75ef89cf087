//! 运行指标
//!
//! 只统计、只记录，不参与任何决策。

use std::time::Duration;

use serde::Serialize;

use crate::models::ScoredCandidate;
use crate::services::selector::ANSWER_SLOTS;

/// 一次运行的质量指标
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunMetrics {
    /// 通过启发式检查的候选比例
    pub valid_rate: f64,
    /// 候选题的平均难度
    pub avg_difficulty: f64,
    /// 候选题选项相似度的平均值
    pub option_similarity_mean: f64,
    /// 选中题目答案位置分布的熵（以2为底，最大 2.0）
    pub position_bias_entropy: f64,
    /// 总耗时 / 选中题目数（秒）
    pub time_per_item: f64,
}

impl RunMetrics {
    /// 基于完整候选池和选题结果计算指标
    ///
    /// # 参数
    /// - `pool`: 全部候选（不只是选中的）
    /// - `position_counts`: 选中题目在各答案位置上的数量
    /// - `selected`: 选中题目数
    /// - `total_elapsed`: 整个运行的耗时
    pub fn compute(
        pool: &[ScoredCandidate],
        position_counts: &[usize; ANSWER_SLOTS],
        selected: usize,
        total_elapsed: Duration,
    ) -> Self {
        let pool_size = pool.len().max(1) as f64;

        let valid = pool.iter().filter(|c| c.heuristic.all_ok()).count();
        let difficulty_sum: i64 = pool.iter().map(|c| c.item.difficulty()).sum();
        let similarity_sum: f64 = pool
            .iter()
            .map(|c| c.heuristic.option_similarity_mean)
            .sum();

        Self {
            valid_rate: valid as f64 / pool_size,
            avg_difficulty: difficulty_sum as f64 / pool_size,
            option_similarity_mean: similarity_sum / pool_size,
            position_bias_entropy: position_entropy(position_counts),
            time_per_item: total_elapsed.as_secs_f64() / selected.max(1) as f64,
        }
    }
}

/// 答案位置分布的香农熵（以2为底）
///
/// 全部为 0 时返回 0.0。
pub fn position_entropy(counts: &[usize; ANSWER_SLOTS]) -> f64 {
    let total = counts.iter().sum::<usize>().max(1) as f64;
    counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HeuristicResult, JudgeVerdict, QuizItem};
    use serde_json::json;

    fn candidate(all_ok: bool, difficulty: i64, similarity: f64) -> ScoredCandidate {
        let mut item = QuizItem::default();
        item.meta.insert("difficulty".into(), json!(difficulty));
        ScoredCandidate {
            seq: 0,
            item,
            heuristic: HeuristicResult {
                height_ok: all_ok,
                answer_ok: true,
                length_ok: true,
                unique_ok: true,
                option_similarity_mean: similarity,
            },
            judge: JudgeVerdict {
                is_unambiguous: true,
                is_supported: true,
                grammar_ok: true,
                difficulty,
                notes: String::new(),
            },
            score: 0.0,
            chunk_id: "doc-001#chunk-1".into(),
            elapsed: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_entropy_bounds() {
        assert_eq!(position_entropy(&[0, 0, 0, 0]), 0.0);
        assert_eq!(position_entropy(&[5, 0, 0, 0]), 0.0);
        assert!((position_entropy(&[1, 1, 1, 1]) - 2.0).abs() < 1e-12);
        assert!((position_entropy(&[2, 2, 0, 0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_compute_over_pool() {
        let pool = vec![
            candidate(true, 2, 0.2),
            candidate(false, 4, 0.4),
            candidate(true, 3, 0.3),
            candidate(true, 3, 0.1),
        ];

        let metrics = RunMetrics::compute(&pool, &[1, 1, 0, 0], 2, Duration::from_secs(10));

        assert_eq!(metrics.valid_rate, 0.75);
        assert_eq!(metrics.avg_difficulty, 3.0);
        assert!((metrics.option_similarity_mean - 0.25).abs() < 1e-12);
        assert!((metrics.position_bias_entropy - 1.0).abs() < 1e-12);
        assert_eq!(metrics.time_per_item, 5.0);
    }

    #[test]
    fn test_empty_pool_yields_zeros() {
        let metrics = RunMetrics::compute(&[], &[0; ANSWER_SLOTS], 0, Duration::from_secs(3));

        assert_eq!(metrics.valid_rate, 0.0);
        assert_eq!(metrics.avg_difficulty, 0.0);
        assert_eq!(metrics.position_bias_entropy, 0.0);
        assert_eq!(metrics.time_per_item, 3.0);
    }
}
