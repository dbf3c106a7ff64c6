use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use joker_core::{CompletionRequest, CompletionResponse, Error, Provider};

use crate::openai::{build_chat_request, build_client, send_chat_request};

pub const DEFAULT_API_VERSION: &str = "2024-10-21";

/// Azure OpenAI chat completions.
///
/// The deployment name selects the model; it is part of the URL rather than
/// the request body, and authentication uses the `api-key` header.
pub struct AzureOpenAIProvider {
    client: Client,
    api_key: String,
    endpoint: String,
    deployment: String,
    api_version: String,
}

impl AzureOpenAIProvider {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            client: build_client(),
            api_key: api_key.into(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            deployment: deployment.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[async_trait]
impl Provider for AzureOpenAIProvider {
    fn name(&self) -> &str {
        "azure"
    }

    fn default_model(&self) -> Option<&str> {
        Some(&self.deployment)
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, Error> {
        let api_request = build_chat_request(&request, None);
        debug!(deployment = %self.deployment, "Azure OpenAI request");

        let builder = self
            .client
            .post(self.completions_url())
            .header("api-key", &self.api_key);

        send_chat_request(builder, &api_request).await
    }
}
