//! Response bodies of all handlers.

mod embeddings;
mod error_response;
mod monitors;

pub use embeddings::{ProcessEmbeddingsResponse, ProcessSingleResponse, ProcessingStatus};
pub use error_response::ErrorResponse;
pub use monitors::MonitorStatusResponse;
