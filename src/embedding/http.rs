/// Hosted feature-extraction endpoint (Hugging Face inference API wire format)
use super::codec::{self, ProviderPayload};
use super::provider::EmbeddingProvider;
use crate::config::EmbeddingConfig;
use crate::error::{FaqError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a str,
    options: EmbedOptions,
}

#[derive(Debug, Serialize)]
struct EmbedOptions {
    wait_for_model: bool,
}

/// Embedding provider calling a remote feature-extraction endpoint
///
/// With `wait_for_model` set the provider blocks until its model is warm
/// instead of answering 503. No other retry is attempted here.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    model_name: String,
    token: Option<String>,
    dimension: usize,
    wait_for_model: bool,
}

impl HttpEmbeddingProvider {
    pub fn new(
        endpoint: impl Into<String>,
        model_name: impl Into<String>,
        token: Option<String>,
        dimension: usize,
        wait_for_model: bool,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FaqError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model_name: model_name.into(),
            token,
            dimension,
            wait_for_model,
        })
    }

    /// Build from the `[embedding]` config section, reading the token from its env var
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let token = config.token();
        if token.is_none() {
            tracing::warn!(
                "{} is not set; calling {} without credentials",
                config.token_env,
                config.endpoint
            );
        }

        Self::new(
            config.endpoint.clone(),
            config.model.clone(),
            token,
            config.dimension,
            config.wait_for_model,
            config.timeout_secs.map(Duration::from_secs),
        )
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(FaqError::InvalidInput("Empty text".to_string()));
        }

        let body = EmbedRequest {
            inputs: text,
            options: EmbedOptions {
                wait_for_model: self.wait_for_model,
            },
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            FaqError::ProviderUnavailable(format!("request to {} failed: {}", self.endpoint, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = if status == StatusCode::SERVICE_UNAVAILABLE {
                format!("model {} is not ready: {}", self.model_name, detail)
            } else {
                format!("provider returned {}: {}", status, detail)
            };
            return Err(FaqError::ProviderUnavailable(message));
        }

        let payload: ProviderPayload = response.json().await.map_err(|e| {
            FaqError::ProviderUnavailable(format!("unreadable embedding response: {}", e))
        })?;

        let embedding = payload.into_vector()?;
        codec::validate(&embedding, self.dimension)?;

        tracing::debug!(
            "Embedded {} chars with {} ({}D)",
            text.len(),
            self.model_name,
            embedding.len()
        );

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
