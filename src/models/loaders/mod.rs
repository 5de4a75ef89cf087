pub mod document_loader;
pub mod jsonl_loader;

pub use document_loader::load_document;
pub use jsonl_loader::{read_jsonl, write_jsonl};
