pub mod llm_client;
pub mod retry;
#[cfg(any(test, feature = "testing"))]
pub mod scripted;

pub use llm_client::{JsonCompleter, OpenAiCompleter};
pub use retry::RetryingCompleter;
#[cfg(any(test, feature = "testing"))]
pub use scripted::ScriptedCompleter;
