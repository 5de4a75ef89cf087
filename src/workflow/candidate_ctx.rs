//! 候选题处理上下文
//!
//! 封装"我正在为哪个文本块生成第几个候选"这一信息

use std::fmt::Display;

use crate::models::Chunk;

/// 候选题处理上下文
#[derive(Debug, Clone)]
pub struct CandidateCtx {
    /// 全局生成序号（从0开始，调度时分配，同分排序依赖它）
    pub seq: usize,

    /// 文本块标识
    pub chunk_id: String,

    /// 文本块序号（从1开始，仅用于日志显示）
    pub chunk_index: usize,

    /// 该文本块内的第几次尝试（从1开始）
    pub attempt: usize,

    /// 每个文本块的尝试总数
    pub attempts_per_chunk: usize,
}

impl CandidateCtx {
    pub fn new(seq: usize, chunk: &Chunk, attempt: usize, attempts_per_chunk: usize) -> Self {
        Self {
            seq,
            chunk_id: chunk.id.clone(),
            chunk_index: chunk.index,
            attempt,
            attempts_per_chunk,
        }
    }
}

impl Display for CandidateCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[块 {} 候选 {}/{}]",
            self.chunk_index, self.attempt, self.attempts_per_chunk
        )
    }
}
