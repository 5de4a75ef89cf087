//! 提示词模板

const QUESTION_PROMPT: &str = r#"SYSTEM: You are a careful exam writer. Create ONE multiple-choice question from the passage.

RULES:
- Exactly 4 options, only one is correct.
- Plausible distractors; avoid overlaps; no giveaways.
- Require understanding of the passage; avoid verbatim copying.
- Return valid JSON ONLY (no commentary).

PASSAGE:
{passage}

OUTPUT JSON SCHEMA:
{"question": "...", "options": ["...","...","...","..."], "answer_index": 0-3, "explanation": "..."}"#;

const DISTRACTOR_IMPROVER: &str = r#"Improve the distractors to be plausible-but-wrong and non-overlapping with the correct answer.
Keep exactly 4 options and the same JSON schema. Return JSON only.

CURRENT ITEM:
{item_json}"#;

const JUDGE_PROMPT: &str = r#"Given the PASSAGE and MCQ, check:
- single unambiguous correct option (true/false),
- answer supported by the passage (true/false),
- grammar ok (true/false),
- difficulty 1..5 with a short rationale.

Return JSON only:
{"is_unambiguous": true, "is_supported": true, "grammar_ok": true, "difficulty": 3, "notes": "..."}
PASSAGE:
{passage}

MCQ:
{item_json}"#;

/// 出题提示词
pub fn question_prompt(passage: &str) -> String {
    fill_template(QUESTION_PROMPT, &[("passage", passage)])
}

/// 改写干扰项提示词，`item_json` 是第一步返回的完整题目
pub fn distractor_prompt(item_json: &str) -> String {
    fill_template(DISTRACTOR_IMPROVER, &[("item_json", item_json)])
}

/// 评审提示词
pub fn judge_prompt(passage: &str, item_json: &str) -> String {
    fill_template(
        JUDGE_PROMPT,
        &[("passage", passage), ("item_json", item_json)],
    )
}

/// 单遍替换 `{key}` 占位符，填入的内容不会再被当作模板解析
fn fill_template(template: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        let hit = pairs.iter().find(|(key, _)| {
            tail.len() > key.len() + 1
                && tail[1..].starts_with(key)
                && tail[1 + key.len()..].starts_with('}')
        });

        match hit {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 2..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_embed_inputs() {
        assert!(question_prompt("The sky is blue.").contains("PASSAGE:\nThe sky is blue."));
        assert!(distractor_prompt("{\"question\":\"Q\"}").ends_with("{\"question\":\"Q\"}"));

        let judge = judge_prompt("P", "{\"q\":1}");
        assert!(judge.contains("PASSAGE:\nP\n"));
        assert!(judge.ends_with("MCQ:\n{\"q\":1}"));
    }

    #[test]
    fn test_judge_prompt_item_text_not_reinterpreted() {
        let judge = judge_prompt("about {item_json}", "{\"question\": \"What is {passage}?\"}");
        assert!(judge.contains("PASSAGE:\nabout {item_json}\n"));
        assert!(judge.contains("What is {passage}?"));
    }

    #[test]
    fn test_schema_braces_left_intact() {
        let prompt = question_prompt("P");
        assert!(prompt.contains("{\"question\": \"...\", \"options\""));
        assert!(!prompt.contains("{passage}"));
    }
}
