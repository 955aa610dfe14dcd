//! Model infrastructure module
//!
//! # Structure
//! - `types` - Request, Response, Error types
//! - `traits` - ModelProvider trait
//! - `adapter` - OpenAI chat format conversion
//! - `clients` - HTTP client implementations

pub mod adapter;
pub mod clients;
pub mod traits;
pub mod types;

pub use clients::AzureOpenAIClient;
pub use traits::ModelProvider;
pub use types::{ModelError, ModelRequest, ModelResponse, ToolDefinition};
