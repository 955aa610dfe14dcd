//! # Agent Module
//!
//! Agent profiles and the runtime that executes them.
//!
//! ## Key Types
//!
//! - [`AgentKind`] - The fixed agent profiles (name + instructions)
//! - [`AgentDescriptor`] - A profile bound to a connection and tool servers
//! - [`AgentRuntime`] - Executes one input against a descriptor
//! - [`ChatAgentRunner`] - Chat-completion implementation of the runtime
//!
//! ## Agent Loop
//!
//! 1. Refuse to run if any tool server has been closed
//! 2. Advertise every server's tools as function definitions
//! 3. While the model asks for tools, call them and feed results back
//! 4. Return the first reply that asks for none

mod context;
mod descriptor;
mod errors;
mod instructions;
mod runner;

pub use context::{ToolContext, render_tool_result};
pub use descriptor::AgentDescriptor;
pub use errors::AgentRuntimeError;
pub use instructions::AgentKind;
pub use runner::{AgentRuntime, ChatAgentRunner, RunOutcome, ToolStep};
