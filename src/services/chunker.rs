//! 文本分块 - 业务能力层
//!
//! 先按空行切段落，再按句末标点切句子，最后把句子贪心拼成不超过目标长度的块。
//! 单句超长时独占一块，块不会跨段落。

use std::sync::OnceLock;

use regex::Regex;

use crate::models::Chunk;

/// 默认目标字符数（约 450 token）
pub const DEFAULT_TARGET_CHARS: usize = 3000;

/// 把文档切成文本块
///
/// # 参数
/// - `text`: 原始文档
/// - `target_chars`: 每块的目标字符数
///
/// # 返回
/// 按文档顺序排列的文本块
pub fn chunk_text(text: &str, target_chars: usize) -> Vec<String> {
    split_paragraphs(text)
        .into_iter()
        .flat_map(|paragraph| pack_sentences(split_sentences(&paragraph), target_chars))
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

/// 切块并分配稳定的 `doc-id#chunk-N` 标识
pub fn chunk_document(doc_id: &str, text: &str, target_chars: usize) -> Vec<Chunk> {
    chunk_text(text, target_chars)
        .into_iter()
        .enumerate()
        .map(|(idx, text)| Chunk::new(doc_id, idx + 1, text))
        .collect()
}

fn split_paragraphs(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// 句末标点后跟空白视为句子边界，标点保留在句子里
pub fn split_sentences(paragraph: &str) -> Vec<String> {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    let boundary = BOUNDARY.get_or_init(|| Regex::new(r"[.!?]\s+").expect("valid regex"));

    let paragraph = paragraph.trim();
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in boundary.find_iter(paragraph) {
        // 标点是单字节 ASCII
        sentences.push(&paragraph[start..m.start() + 1]);
        start = m.end();
    }
    sentences.push(&paragraph[start..]);

    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn pack_sentences(sentences: Vec<String>, target_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut length = 0;

    for sentence in sentences {
        let sentence_len = sentence.chars().count() + 1;
        if length + sentence_len > target_chars && !current.is_empty() {
            chunks.push(current.join(" ").trim().to_string());
            current.clear();
            length = 0;
        }
        length += sentence_len;
        current.push(sentence);
    }

    if !current.is_empty() {
        chunks.push(current.join(" ").trim().to_string());
    }

    chunks
}
