//! Embedding processing request types.

use serde::{Deserialize, Serialize};

use crate::handler::{Error, ErrorKind, Result};

/// Body of the batch processing endpoint.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProcessEmbeddingsRequest {
    #[serde(default)]
    pub user_id: Option<String>,
}

impl ProcessEmbeddingsRequest {
    /// Returns the user id, rejecting a missing, empty or path-like value.
    pub fn user_id(&self) -> Result<&str> {
        user_id(self.user_id.as_deref())
    }
}

/// Body of the single-object processing endpoint.
#[must_use]
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProcessSingleRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    /// Object name, with or without the `{user_id}/` prefix.
    #[serde(default)]
    pub blob_name: Option<String>,
}

impl ProcessSingleRequest {
    /// Returns `(user_id, blob_name)`, rejecting missing or empty values and
    /// names that would leave the user's directory.
    pub fn parameters(&self) -> Result<(&str, &str)> {
        let user_id = user_id(self.user_id.as_deref())?;
        let blob_name = required("blob_name", self.blob_name.as_deref())?;

        let escapes = blob_name.starts_with('/')
            || blob_name.contains('\\')
            || blob_name
                .split('/')
                .any(|segment| matches!(segment, "" | "." | ".."));
        if escapes {
            return Err(invalid("blob_name"));
        }

        Ok((user_id, blob_name))
    }
}

fn user_id(value: Option<&str>) -> Result<&str> {
    let user_id = required("user_id", value)?;
    if user_id.contains(['/', '\\']) || matches!(user_id, "." | "..") {
        return Err(invalid("user_id"));
    }
    Ok(user_id)
}

fn invalid(name: &'static str) -> Error<'static> {
    ErrorKind::BadRequest
        .with_message(format!("Invalid {name} in request"))
        .with_resource(name)
}

fn required<'a>(name: &'static str, value: Option<&'a str>) -> Result<&'a str> {
    match value {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ErrorKind::MissingParameter
            .with_message(format!("Missing {name} in request"))
            .with_resource(name)),
    }
}
