//! 打分 - 业务能力层
//!
//! 把启发式检查和评审结果合成一个用于排序的分数。

use crate::models::JudgeVerdict;

/// 选项平均相似度达到该值时扣分
pub const SIMILARITY_PENALTY_THRESHOLD: f64 = 0.8;

/// 计算候选题的综合得分
///
/// 各项简单相加，不做归一化，只用于候选题之间的相对排序。
pub fn score_candidate(heuristic_ok: bool, judge: &JudgeVerdict, option_similarity_mean: f64) -> f64 {
    let mut score = 0.0;
    if heuristic_ok {
        score += 1.0;
    }
    if judge.is_unambiguous {
        score += 1.0;
    }
    if judge.is_supported {
        score += 1.0;
    }
    if judge.grammar_ok {
        score += 0.5;
    }
    if option_similarity_mean >= SIMILARITY_PENALTY_THRESHOLD {
        score -= 0.5;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(all: bool) -> JudgeVerdict {
        JudgeVerdict {
            is_unambiguous: all,
            is_supported: all,
            grammar_ok: all,
            difficulty: 3,
            notes: String::new(),
        }
    }

    #[test]
    fn test_full_marks() {
        assert_eq!(score_candidate(true, &verdict(true), 0.2), 3.5);
    }

    #[test]
    fn test_similarity_penalty_at_threshold() {
        assert_eq!(score_candidate(true, &verdict(true), 0.8), 3.0);
        assert_eq!(score_candidate(false, &verdict(false), 0.95), -0.5);
    }

    #[test]
    fn test_all_false_never_beats_all_true() {
        for sim in [0.0, 0.5, 0.79, 0.8, 1.0] {
            assert!(score_candidate(false, &verdict(false), sim) <= score_candidate(true, &verdict(true), sim));
        }
    }

    #[test]
    fn test_individual_weights() {
        let mut v = verdict(false);
        v.grammar_ok = true;
        assert_eq!(score_candidate(false, &v, 0.0), 0.5);
        v.is_supported = true;
        assert_eq!(score_candidate(false, &v, 0.0), 1.5);
    }
}
