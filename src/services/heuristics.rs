//! 启发式检查 - 业务能力层
//!
//! 纯本地、不调用模型的结构检查：选项数量、答案下标、文本长度、选项相似度。

use crate::models::{HeuristicResult, QuizItem};

/// 题干长度范围（字符）
pub const QUESTION_LEN_RANGE: (usize, usize) = (50, 300);
/// 解析长度范围（字符）
pub const EXPLANATION_LEN_RANGE: (usize, usize) = (10, 600);
/// 任意两个选项的相似度达到该值即视为重复
pub const DUPLICATE_SIMILARITY: f64 = 0.85;

/// 两个选项的相似度：1 - 归一化编辑距离（忽略大小写）
pub fn option_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// 所有无序选项对的相似度
fn pairwise_similarities(options: &[String]) -> Vec<f64> {
    let mut scores = Vec::new();
    for i in 0..options.len() {
        for j in (i + 1)..options.len() {
            scores.push(option_similarity(&options[i], &options[j]));
        }
    }
    scores
}

fn mean(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}

/// 选项两两相似度的平均值，少于 2 个选项时为 0
pub fn options_similarity_mean(options: &[String]) -> f64 {
    mean(&pairwise_similarities(options))
}

fn within(len: usize, (min, max): (usize, usize)) -> bool {
    (min..=max).contains(&len)
}

/// 对题目做启发式检查
pub fn heuristic_check(item: &QuizItem) -> HeuristicResult {
    let question_len = item.question.trim().chars().count();
    let explanation_len = item.explanation.trim().chars().count();

    let similarities = pairwise_similarities(&item.options);

    HeuristicResult {
        height_ok: item.options.len() == 4,
        answer_ok: (0..4).contains(&item.answer_index),
        length_ok: within(question_len, QUESTION_LEN_RANGE)
            && within(explanation_len, EXPLANATION_LEN_RANGE),
        unique_ok: similarities.iter().all(|s| *s < DUPLICATE_SIMILARITY),
        option_similarity_mean: mean(&similarities),
    }
}
