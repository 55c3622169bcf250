//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Security: CORS and request body limits
//! - Observability: request ids and tracing spans
//! - Recovery: panics, timeouts and service errors
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use metavec_server::middleware::{
//!     CorsConfig, RecoveryConfig, RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_security(&CorsConfig::default())
//!     .with_observability()
//!     .with_recovery(&RecoveryConfig::default());
//! ```

mod observability;
mod recovery;
mod security;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, DEFAULT_MAX_BODY_SIZE, RouterSecurityExt};
