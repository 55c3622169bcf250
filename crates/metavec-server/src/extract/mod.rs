//! Request extractors with HTTP-error rejections.
//!
//! - [`Json`]: JSON body deserialization whose rejections render as
//!   [`Error`](crate::handler::Error) responses.

mod json;

pub use json::Json;
