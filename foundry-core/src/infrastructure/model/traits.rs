//! Model traits

use super::types::{ModelError, ModelRequest, ModelResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Trait for chat-completion backends
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Send one chat request and return the assistant's reply
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;
}

#[async_trait]
impl<P: ModelProvider + ?Sized> ModelProvider for Arc<P> {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        (**self).chat(request).await
    }
}
