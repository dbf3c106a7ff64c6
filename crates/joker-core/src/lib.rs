//! joker-core: Core types and traits for joker
//!
//! This crate provides the foundational pieces shared by the rest of the
//! workspace: the chat provider abstraction, tools, the configurable agent,
//! and the two-stage sequential pipeline.

pub mod agent;
pub mod blocking;
pub mod error;
pub mod message;
pub mod pipeline;
pub mod provider;
pub mod tool;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use agent::{Agent, AgentConfig};
pub use blocking::run_blocking;
pub use error::Error;
pub use message::{Message, Role, ToolCall, Usage};
pub use pipeline::{
    content_preview, ConsoleProgress, Pipeline, PipelineEvent, PipelineProgressHandler,
    PipelineState, Stage,
};
pub use provider::{CompletionRequest, CompletionResponse, FinishReason, Provider};
pub use tool::{PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters, ToolRegistry};

pub type Result<T> = std::result::Result<T, Error>;
