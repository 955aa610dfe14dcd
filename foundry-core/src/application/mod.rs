//! # Application Module
//!
//! ## Submodules
//!
//! - [`tooling`] - Tool-server catalog, MCP sessions and scoped lifecycle
//! - [`agent`] - Agent profiles and the chat-completion runtime

pub mod agent;
pub mod tooling;
