//! Wire format of deferred generation jobs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A deferred image generation job consumed by the worker
///
/// Generation jobs carry only the avatar identifier, model tag and prompt.
/// Ingest jobs produced by `editAvatar` additionally carry `source_url`, the
/// provider asset to mirror into the bucket under `{uuid}.jpg`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationJob {
    pub uuid: Uuid,
    pub ai_model: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl GenerationJob {
    /// Job for a brand-new avatar; the worker calls the provider itself
    pub fn generate(uuid: Uuid, ai_model: &str, prompt: &str) -> Self {
        Self {
            uuid,
            ai_model: ai_model.to_string(),
            prompt: prompt.to_string(),
            source_url: None,
        }
    }

    /// Job for an already-generated asset that only needs mirroring
    pub fn ingest(uuid: Uuid, ai_model: &str, prompt: &str, source_url: String) -> Self {
        Self {
            uuid,
            ai_model: ai_model.to_string(),
            prompt: prompt.to_string(),
            source_url: Some(source_url),
        }
    }
}
