//! Model clients

mod azure;
mod base;

pub use azure::AzureOpenAIClient;
pub use base::HttpClientBase;
