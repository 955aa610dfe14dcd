//! Azure OpenAI chat-completions client

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::base::HttpClientBase;
use crate::config::ConnectionDescriptor;
use crate::infrastructure::model::adapter::{MessageAdapter, OpenAIMessage};
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{ModelError, ModelRequest, ModelResponse};

/// Client for an Azure OpenAI chat deployment. The target deployment and
/// credential come from each request's [`ConnectionDescriptor`].
#[derive(Debug, Clone, Default)]
pub struct AzureOpenAIClient {
    base: HttpClientBase,
}

impl AzureOpenAIClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{endpoint}/openai/deployments/{deployment}/chat/completions`, without
    /// the `api-version` query.
    pub fn completions_url(connection: &ConnectionDescriptor) -> String {
        HttpClientBase::build_url(
            connection.endpoint(),
            &format!(
                "openai/deployments/{}/chat/completions",
                connection.deployment()
            ),
        )
    }
}

#[async_trait]
impl ModelProvider for AzureOpenAIClient {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let connection = &request.connection;
        let deployment = connection.deployment();
        let url = Self::completions_url(connection);

        let payload = AzureRequest {
            messages: MessageAdapter::to_openai_format(&request.messages),
            tools: MessageAdapter::tools_to_openai_format(&request.tools),
        };

        info!(
            deployment,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "Sending request to Azure OpenAI"
        );

        let response: AzureResponse = self
            .base
            .post_with_api_key(
                deployment,
                &url,
                &[("api-version", connection.api_version())],
                connection.credential().expose_secret(),
                &payload,
            )
            .await?;
        debug!(deployment, "Received response from Azure OpenAI");

        let message = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .ok_or_else(|| ModelError::invalid_response(deployment, "missing message"))?;

        Ok(ModelResponse::new(MessageAdapter::from_openai_message(
            message,
        )))
    }
}

#[derive(Serialize)]
struct AzureRequest {
    messages: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct AzureResponse {
    #[serde(default)]
    choices: Vec<AzureChoice>,
}

#[derive(Deserialize)]
struct AzureChoice {
    message: Option<OpenAIMessage>,
}
