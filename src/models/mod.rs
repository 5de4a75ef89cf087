pub mod candidate;
pub mod chunk;
pub mod item;
pub mod judge;
pub mod loaders;
pub mod schema;

pub use candidate::{HeuristicResult, ScoredCandidate};
pub use chunk::Chunk;
pub use item::{JsonMap, QuizItem};
pub use judge::JudgeVerdict;
pub use loaders::{load_document, read_jsonl, write_jsonl};
pub use schema::{ItemSchema, ResponseSchema};
