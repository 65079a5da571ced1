//! Runware text-to-image client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::config::ProviderConfig;
use crate::error::{AppError, Result};
use crate::provider::catalog;
use crate::provider::traits::ImageGenerator;

/// HTTP client for the Runware inference API
///
/// Each call posts a single task to the provider and returns the first image
/// URL from the result set.
pub struct RunwareClient {
    client: Client,
    base_url: String,
    api_key: String,
}

/// A single inference task in the provider's task-array wire format
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InferenceTask {
    task_type: &'static str,
    #[serde(rename = "taskUUID")]
    task_uuid: Uuid,
    positive_prompt: String,
    model: String,
    number_results: u32,
    height: u32,
    width: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_images: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    data: Vec<ApiImageData>,
    #[serde(default)]
    errors: Vec<ApiErrorData>,
}

#[derive(Debug, Deserialize)]
struct ApiImageData {
    #[serde(default, rename = "imageURL")]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorData {
    #[serde(default)]
    message: Option<String>,
}

impl RunwareClient {
    /// Create a new client from provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn run_task(&self, task: InferenceTask) -> Result<String> {
        let task_uuid = task.task_uuid;
        debug!(task_uuid = %task_uuid, model = %task.model, "Sending inference task");

        let response = self
            .client
            .post(self.base_url.as_str())
            .bearer_auth(&self.api_key)
            .json(&[task])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(format!(
                "Provider returned {}: {}",
                status, body
            )));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to parse response: {}", e)))?;

        if let Some(err) = api_response.errors.first() {
            return Err(AppError::Provider(
                err.message.clone().unwrap_or_else(|| "unknown provider error".to_string()),
            ));
        }

        api_response
            .data
            .into_iter()
            .find_map(|img| img.image_url)
            .ok_or_else(|| AppError::Provider("Provider returned no images".to_string()))
    }
}

#[async_trait]
impl ImageGenerator for RunwareClient {
    async fn generate(&self, model_tag: &str, prompt: &str) -> Result<String> {
        let model = catalog::resolve(model_tag)?;

        self.run_task(InferenceTask {
            task_type: "imageInference",
            task_uuid: Uuid::new_v4(),
            positive_prompt: prompt.to_string(),
            model: model.to_string(),
            number_results: 1,
            height: 512,
            width: 512,
            input_images: None,
        })
        .await
    }

    async fn regenerate(
        &self,
        model_tag: &str,
        prompt: &str,
        reference_images: &[String],
    ) -> Result<String> {
        let model = catalog::resolve(model_tag)?;

        self.run_task(InferenceTask {
            task_type: "photoMaker",
            task_uuid: Uuid::new_v4(),
            positive_prompt: prompt.to_string(),
            model: model.to_string(),
            number_results: 1,
            height: 512,
            width: 512,
            input_images: Some(reference_images.to_vec()),
        })
        .await
    }
}
