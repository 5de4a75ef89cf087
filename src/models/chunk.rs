use std::fmt::Display;

/// 文本块
///
/// 创建后不可变，`id` 形如 `doc-001#chunk-3`（序号从 1 开始）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 稳定标识
    pub id: String,
    /// 在文档中的位置（从1开始）
    pub index: usize,
    /// 文本内容
    pub text: String,
}

impl Chunk {
    pub fn new(doc_id: &str, index: usize, text: impl Into<String>) -> Self {
        Self {
            id: format!("{}#chunk-{}", doc_id, index),
            index,
            text: text.into(),
        }
    }

    /// 字符数
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

impl Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} | {} 字符]", self.id, self.char_count())
    }
}
