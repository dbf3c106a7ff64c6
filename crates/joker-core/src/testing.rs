//! Scripted provider for tests.
//! Only compiled when running tests or with the `testing` feature.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::Error;
use crate::message::{Message, ToolCall, Usage};
use crate::provider::{CompletionRequest, CompletionResponse, FinishReason, Provider};

/// Provider that replays a script of outcomes and records every request.
///
/// Outcomes are consumed first-in first-out. Once the script runs dry every
/// call fails with a network error, which stands in for an unreachable
/// service.
pub struct MockProvider {
    script: Mutex<VecDeque<Result<CompletionResponse, Error>>>,
    /// Requests seen so far, oldest first.
    pub captured_requests: Mutex<Vec<CompletionRequest>>,
    default_model: Option<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            captured_requests: Mutex::new(Vec::new()),
            default_model: None,
        }
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    /// Script a plain text answer.
    pub fn queue_response(&self, content: &str) {
        self.queue_raw_response(CompletionResponse {
            message: Message::assistant(content),
            usage: Usage::default(),
            model: "mock-model".to_string(),
            finish_reason: FinishReason::Stop,
        });
    }

    /// Script a turn where the model asks for a single tool call.
    pub fn queue_tool_call(&self, id: &str, tool: &str, arguments: serde_json::Value) {
        self.queue_raw_response(CompletionResponse {
            message: Message::assistant_with_tool_calls("", vec![ToolCall::new(id, tool, arguments)]),
            usage: Usage::default(),
            model: "mock-model".to_string(),
            finish_reason: FinishReason::ToolCalls,
        });
    }

    pub fn queue_raw_response(&self, response: CompletionResponse) {
        self.script.lock().unwrap().push_back(Ok(response));
    }

    /// Script a failed call.
    pub fn queue_error(&self, error: Error) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    pub fn request_count(&self) -> usize {
        self.captured_requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.captured_requests.lock().unwrap().last().cloned()
    }

    /// Request number `index`, counting from zero.
    pub fn request(&self, index: usize) -> Option<CompletionRequest> {
        self.captured_requests.lock().unwrap().get(index).cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn default_model(&self) -> Option<&str> {
        self.default_model.as_deref()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, Error> {
        self.captured_requests.lock().unwrap().push(request);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::network("mock script exhausted")))
    }
}
