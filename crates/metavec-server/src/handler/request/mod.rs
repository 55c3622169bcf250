//! Request bodies of all handlers.

mod embeddings;

pub use embeddings::{ProcessEmbeddingsRequest, ProcessSingleRequest};
