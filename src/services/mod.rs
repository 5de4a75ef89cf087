pub mod chunker;
pub mod generator;
pub mod heuristics;
pub mod judge;
pub mod prompts;
pub mod scorer;
pub mod selector;

pub use chunker::{chunk_document, chunk_text};
pub use generator::CandidateGenerator;
pub use heuristics::heuristic_check;
pub use judge::Judge;
pub use scorer::score_candidate;
pub use selector::{select_items, Selection};
