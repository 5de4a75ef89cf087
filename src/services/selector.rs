//! 选题 - 业务能力层
//!
//! 候选题先按得分排好序（同分保持生成顺序），之后只从池子里取走、不再重排。
//! 每轮优先找"当前用得最少的答案位置"的最高分候选，找不到就直接取池首。

use std::cmp::Ordering;

use serde_json::json;
use tracing::debug;

use crate::models::{QuizItem, ScoredCandidate};

/// 答案位置数量（A/B/C/D）
pub const ANSWER_SLOTS: usize = 4;

/// 选题结果
#[derive(Debug, Clone)]
pub struct Selection {
    /// 选中的题目，按选中顺序排列
    pub items: Vec<QuizItem>,
    /// 选中题目在每个答案位置上的数量
    pub position_counts: [usize; ANSWER_SLOTS],
}

/// 按得分从高到低排序，同分时按生成序号
pub fn rank_candidates(candidates: &[ScoredCandidate]) -> Vec<&ScoredCandidate> {
    let mut ranked: Vec<&ScoredCandidate> = candidates.iter().collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then(a.seq.cmp(&b.seq))
    });
    ranked
}

/// 当前数量最少的答案位置，数量相同时取下标最小的
fn least_used_slot(counts: &[usize; ANSWER_SLOTS]) -> usize {
    let mut best = 0;
    for slot in 1..ANSWER_SLOTS {
        if counts[slot] < counts[best] {
            best = slot;
        }
    }
    best
}

/// 选出 `target_count` 道题，同时尽量均衡答案位置
///
/// 候选不足时返回全部候选，不报错。选中的题目会带上 `source_id`
/// 和 `meta.time_sec`（耗时四舍五入到秒）。
pub fn select_items(candidates: &[ScoredCandidate], target_count: usize) -> Selection {
    let mut remaining = rank_candidates(candidates);
    let mut position_counts = [0usize; ANSWER_SLOTS];
    let mut items = Vec::with_capacity(target_count.min(remaining.len()));

    while items.len() < target_count && !remaining.is_empty() {
        let target_slot = least_used_slot(&position_counts);

        // 没有匹配位置的候选时退回池首（最高分）
        let chosen = remaining
            .iter()
            .position(|c| c.item.answer_slot() == Some(target_slot))
            .unwrap_or(0);
        let candidate = remaining.remove(chosen);

        debug!(
            "选中候选 #{} (得分 {:.1}, 答案位置 {}, 目标位置 {})",
            candidate.seq, candidate.score, candidate.item.answer_index, target_slot
        );

        let item = finalize_item(candidate);
        if let Some(slot) = item.answer_slot() {
            position_counts[slot] += 1;
        }
        items.push(item);
    }

    Selection {
        items,
        position_counts,
    }
}

fn finalize_item(candidate: &ScoredCandidate) -> QuizItem {
    let mut item = candidate.item.clone();
    item.source_id = Some(candidate.chunk_id.clone());
    item.meta.insert(
        "time_sec".to_string(),
        json!(candidate.elapsed.as_secs_f64().round() as i64),
    );
    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HeuristicResult, JudgeVerdict};
    use crate::orchestrator::metrics::position_entropy;
    use std::time::Duration;

    fn candidate(seq: usize, answer_index: i64, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            seq,
            item: QuizItem {
                question: format!("question {}", seq),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                answer_index,
                explanation: "explanation".into(),
                ..QuizItem::default()
            },
            heuristic: HeuristicResult {
                height_ok: true,
                answer_ok: true,
                length_ok: true,
                unique_ok: true,
                option_similarity_mean: 0.1,
            },
            judge: JudgeVerdict {
                is_unambiguous: true,
                is_supported: true,
                grammar_ok: true,
                difficulty: 3,
                notes: String::new(),
            },
            score,
            chunk_id: format!("doc-001#chunk-{}", seq / 3 + 1),
            elapsed: Duration::from_millis(1500 + seq as u64 * 100),
        }
    }

    fn answers(selection: &Selection) -> Vec<i64> {
        selection.items.iter().map(|i| i.answer_index).collect()
    }

    #[test]
    fn test_rotation_order() {
        // 最高分都在位置 2，但选题仍按 0 → 1 → 2 → 3 轮换
        let pool = vec![
            candidate(0, 2, 3.5),
            candidate(1, 2, 3.5),
            candidate(2, 1, 3.0),
            candidate(3, 0, 2.5),
            candidate(4, 3, 2.0),
        ];

        let selection = select_items(&pool, 4);

        assert_eq!(answers(&selection), vec![0, 1, 2, 3]);
        assert_eq!(selection.position_counts, [1, 1, 1, 1]);
        assert_eq!(selection.items[2].question, "question 0");
    }

    #[test]
    fn test_ties_keep_generation_order() {
        let pool = vec![candidate(0, 0, 2.0), candidate(1, 0, 2.0), candidate(2, 0, 2.0)];

        let ranked: Vec<usize> = rank_candidates(&pool).iter().map(|c| c.seq).collect();
        assert_eq!(ranked, vec![0, 1, 2]);

        let pool = vec![candidate(5, 0, 1.0), candidate(2, 0, 3.0), candidate(1, 0, 1.0)];
        let ranked: Vec<usize> = rank_candidates(&pool).iter().map(|c| c.seq).collect();
        assert_eq!(ranked, vec![2, 1, 5]);
    }

    #[test]
    fn test_fallback_takes_pool_head() {
        // 只有位置 1 的候选：每轮目标位置都落空，退回池首
        let pool = vec![candidate(0, 1, 1.0), candidate(1, 1, 3.0), candidate(2, 1, 2.0)];

        let selection = select_items(&pool, 2);

        let seqs: Vec<&str> = selection.items.iter().map(|i| i.question.as_str()).collect();
        assert_eq!(seqs, vec!["question 1", "question 2"]);
        assert_eq!(selection.position_counts, [0, 2, 0, 0]);
    }

    #[test]
    fn test_returns_min_of_target_and_pool() {
        let pool: Vec<ScoredCandidate> = (0..5).map(|i| candidate(i, (i % 4) as i64, 1.0)).collect();

        assert_eq!(select_items(&pool, 3).items.len(), 3);
        assert_eq!(select_items(&pool, 5).items.len(), 5);
        assert_eq!(select_items(&pool, 50).items.len(), 5);
        assert!(select_items(&pool, 0).items.is_empty());
        assert!(select_items(&[], 4).items.is_empty());
    }

    #[test]
    fn test_selected_items_get_source_and_time() {
        let pool = vec![candidate(4, 0, 1.0)];

        let selection = select_items(&pool, 1);
        let item = &selection.items[0];

        assert_eq!(item.source_id.as_deref(), Some("doc-001#chunk-2"));
        assert_eq!(item.meta["time_sec"], json!(2));
        assert!(pool[0].item.source_id.is_none());
    }

    #[test]
    fn test_out_of_range_answer_not_counted() {
        let pool = vec![candidate(0, 7, 3.0)];

        let selection = select_items(&pool, 4);

        assert_eq!(selection.items.len(), 1);
        assert_eq!(selection.position_counts, [0, 0, 0, 0]);
    }

    #[test]
    fn test_balancing_beats_naive_top_scores() {
        // 池子偏向位置 0：高分全在位置 0
        let mut pool: Vec<ScoredCandidate> = (0..6).map(|i| candidate(i, 0, 3.5)).collect();
        pool.push(candidate(6, 1, 3.0));
        pool.push(candidate(7, 2, 3.0));
        pool.push(candidate(8, 3, 3.0));

        let balanced = select_items(&pool, 4);

        let mut naive_counts = [0usize; ANSWER_SLOTS];
        for c in rank_candidates(&pool).into_iter().take(4) {
            naive_counts[c.item.answer_index as usize] += 1;
        }

        let balanced_entropy = position_entropy(&balanced.position_counts);
        assert!((balanced_entropy - 2.0).abs() < 1e-9);
        assert!(balanced_entropy > position_entropy(&naive_counts));
    }

    #[test]
    fn test_uniform_pool_reaches_max_entropy() {
        let pool: Vec<ScoredCandidate> = (0..12)
            .map(|i| candidate(i, (i % 4) as i64, 2.0 + (i % 3) as f64 * 0.5))
            .collect();

        let selection = select_items(&pool, 4);

        assert!((position_entropy(&selection.position_counts) - 2.0).abs() < 1e-9);
    }
}
