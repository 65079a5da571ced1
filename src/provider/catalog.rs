//! Fixed mapping of human-readable model tags to provider model identifiers

use crate::error::{AppError, Result};

/// Model tags accepted by the API
pub const MODEL_TAGS: [&str; 3] = ["anime", "cartoon", "lego"];

/// Resolve a model tag to the provider-specific model identifier
///
/// Unknown tags are a classified error, never a lookup fault.
pub fn resolve(tag: &str) -> Result<&'static str> {
    match tag {
        // "cartoon" ships the same checkpoint as "anime" until it gets its own
        "anime" | "cartoon" => Ok("civitai:30240@125771"),
        "lego" => Ok("civitai:306814@344398"),
        other => Err(AppError::UnsupportedModel(other.to_string())),
    }
}
