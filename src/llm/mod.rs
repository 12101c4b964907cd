//! Client for the external text-classification provider.
//!
//! Trait-based so the HTTP handlers can be exercised with a stub in
//! tests. The provider turns free-form text into candidate task records;
//! its output is always run through the engine before anything trusts it.

mod error;
mod openai;

pub use error::{RetryConfig, UpstreamError};
pub use openai::{OpenAiClient, DEFAULT_MODEL};

use async_trait::async_trait;

use crate::engine::Task;

/// Boundary to the external classifier: free-form text in, well-formed
/// tasks out.
#[async_trait]
pub trait TaskClassifier: Send + Sync {
    /// Ask the provider to split `input` into tasks and normalize the result.
    async fn classify_tasks(&self, input: &str) -> Result<Vec<Task>, UpstreamError>;
}
