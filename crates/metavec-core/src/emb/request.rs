use serde::{Deserialize, Serialize};

/// A single embedding request: one model, one input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// Model identifier understood by the provider.
    pub model: String,
    /// Text to embed.
    pub input: String,
}

impl EmbeddingRequest {
    /// Creates a new request.
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
        }
    }
}
