//! The configurable agent.
//!
//! An agent is a system instruction paired with an optional set of tools.
//! Each call to [`Agent::run`] is one independent generation: no history is
//! kept between calls.

use std::sync::Arc;

use tracing::debug;

use crate::error::Error;
use crate::message::{Message, ToolCall};
use crate::provider::{CompletionRequest, Provider};
use crate::tool::ToolRegistry;

const DEFAULT_MAX_TURNS: usize = 10;

/// Configuration for a single agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Agent name, used in logs.
    pub name: String,
    /// System instruction sent ahead of every prompt.
    pub system_prompt: Option<String>,
    /// Model override; falls back to the provider default.
    pub model: Option<String>,
    /// Upper bound on model round-trips when tools are being called.
    pub max_turns: usize,
}

impl AgentConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            system_prompt: None,
            model: None,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max_turns(mut self, max: usize) -> Self {
        self.max_turns = max;
        self
    }
}

/// An LLM-backed agent with an optional tool table.
pub struct Agent {
    config: AgentConfig,
    provider: Arc<dyn Provider>,
    tools: Arc<ToolRegistry>,
}

impl Agent {
    pub fn new(provider: Arc<dyn Provider>, tools: Arc<ToolRegistry>, config: AgentConfig) -> Self {
        Self {
            config,
            provider,
            tools,
        }
    }

    /// Create an agent that exposes no tools to the model.
    pub fn without_tools(provider: Arc<dyn Provider>, config: AgentConfig) -> Self {
        Self::new(provider, Arc::new(ToolRegistry::new()), config)
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Run one prompt to completion and return the generated text.
    ///
    /// Tool calls requested by the model are executed through the registry
    /// and their output is fed back until the model answers in plain text.
    /// A response with no text yields an empty string.
    pub async fn run(&self, prompt: &str) -> Result<String, Error> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = &self.config.system_prompt {
            messages.push(Message::system(system.as_str()));
        }
        messages.push(Message::user(prompt));

        debug!(
            agent = %self.config.name,
            prompt_len = prompt.len(),
            tools_available = self.tools.len(),
            "Agent run starting"
        );

        for turn in 0..self.config.max_turns {
            let mut request =
                CompletionRequest::new(messages.clone()).with_tools(self.tools.definitions());
            if let Some(model) = &self.config.model {
                request = request.with_model(model.as_str());
            }

            let response = self.provider.complete(request).await?;

            debug!(
                agent = %self.config.name,
                turn,
                prompt_tokens = response.usage.prompt_tokens,
                completion_tokens = response.usage.completion_tokens,
                "Completion received"
            );

            if !response.wants_tools() {
                debug!(
                    agent = %self.config.name,
                    turns = turn + 1,
                    response_len = response.message.content.len(),
                    "Agent completed"
                );
                return Ok(response.message.content);
            }

            let tool_calls = response.message.tool_calls;
            messages.push(Message::assistant_with_tool_calls("", tool_calls.clone()));
            for tool_call in &tool_calls {
                debug!(agent = %self.config.name, tool = %tool_call.name, "Executing tool");
                let result = execute_tool(&self.tools, tool_call).await;
                messages.push(Message::tool_result(&tool_call.id, result));
            }
        }

        Err(Error::MaxTurnsExceeded {
            agent: self.config.name.clone(),
            max_turns: self.config.max_turns,
        })
    }
}

/// Execute a single tool call, folding every failure into the result text.
async fn execute_tool(registry: &ToolRegistry, tool_call: &ToolCall) -> String {
    let Some(tool) = registry.get(&tool_call.name) else {
        return format!("Error: Unknown tool '{}'", tool_call.name);
    };

    match tool.execute(tool_call.arguments.clone()).await {
        Ok(output) if output.is_error => format!("Error: {}", output.content),
        Ok(output) => output.content,
        Err(e) => format!("Error executing tool: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Role, Usage};
    use crate::provider::{CompletionResponse, FinishReason};
    use crate::testing::MockProvider;
    use crate::tool::{PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters};
    use async_trait::async_trait;

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn name(&self) -> &str {
            "upper"
        }

        fn description(&self) -> &str {
            "Uppercase the text argument"
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(self.name(), self.description()).with_parameters(
                ToolParameters::new().add_property("text", PropertySchema::string("Text"), true),
            )
        }

        async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, Error> {
            match arguments["text"].as_str() {
                Some(text) => Ok(ToolOutput::success(text.to_uppercase())),
                None => Ok(ToolOutput::error("missing text")),
            }
        }
    }

    fn tools_with_upper() -> Arc<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(UpperTool));
        Arc::new(registry)
    }

    #[test]
    fn test_agent_config() {
        let config = AgentConfig::new("joker")
            .with_system_prompt("You are good at telling jokes.")
            .with_model("gpt-4o-mini")
            .with_max_turns(3);

        assert_eq!(config.name, "joker");
        assert_eq!(config.system_prompt.as_deref(), Some("You are good at telling jokes."));
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.max_turns, 3);
    }

    #[tokio::test]
    async fn test_run_sends_system_and_user_messages() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_response("Why did the pirate...");

        let agent = Agent::without_tools(
            provider.clone(),
            AgentConfig::new("joker").with_system_prompt("Tell jokes."),
        );
        let result = agent.run("Tell me a joke about a pirate").await.unwrap();

        assert_eq!(result, "Why did the pirate...");
        let request = provider.last_request().unwrap();
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages[0].content, "Tell jokes.");
        assert_eq!(request.messages[1].role, Role::User);
        assert!(request.tools.is_empty());
    }

    #[tokio::test]
    async fn test_run_without_system_prompt() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_response("hi");

        let agent = Agent::without_tools(provider.clone(), AgentConfig::new("bare"));
        agent.run("hello").await.unwrap();

        let request = provider.last_request().unwrap();
        assert_eq!(request.messages.len(), 1);
        assert_eq!(request.messages[0].role, Role::User);
    }

    #[tokio::test]
    async fn test_empty_response_yields_empty_string() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_response("");

        let agent = Agent::without_tools(provider, AgentConfig::new("quiet"));
        assert_eq!(agent.run("anything").await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_model_override_is_sent() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_response("ok");

        let agent = Agent::without_tools(provider.clone(), AgentConfig::new("m").with_model("gpt-4o"));
        agent.run("hi").await.unwrap();

        assert_eq!(provider.last_request().unwrap().model.as_deref(), Some("gpt-4o"));
    }

    #[tokio::test]
    async fn test_tool_call_loop() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_tool_call("call-1", "upper", serde_json::json!({"text": "seattle"}));
        provider.queue_response("It says SEATTLE.");

        let agent = Agent::new(provider.clone(), tools_with_upper(), AgentConfig::new("tooling"));
        let result = agent.run("shout seattle").await.unwrap();

        assert_eq!(result, "It says SEATTLE.");
        assert_eq!(provider.request_count(), 2);

        let second = provider.last_request().unwrap();
        assert_eq!(second.tools.len(), 1);
        assert_eq!(second.tools[0].name, "upper");

        let tool_msg = second.messages.last().unwrap();
        assert_eq!(tool_msg.role, Role::Tool);
        assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call-1"));
        assert_eq!(tool_msg.content, "SEATTLE");
    }

    #[tokio::test]
    async fn test_unknown_and_failing_tools_report_errors() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_raw_response(CompletionResponse {
            message: Message::assistant_with_tool_calls(
                "",
                vec![
                    ToolCall::new("call-1", "missing", serde_json::json!({})),
                    ToolCall::new("call-2", "upper", serde_json::json!({})),
                ],
            ),
            usage: Usage::default(),
            model: "mock-model".to_string(),
            finish_reason: FinishReason::ToolCalls,
        });
        provider.queue_response("done");

        let agent = Agent::new(provider.clone(), tools_with_upper(), AgentConfig::new("tooling"));
        agent.run("go").await.unwrap();

        let request = provider.last_request().unwrap();
        let tool_messages: Vec<_> = request
            .messages
            .iter()
            .filter(|m| m.role == Role::Tool)
            .collect();
        assert_eq!(tool_messages.len(), 2);
        assert_eq!(tool_messages[0].content, "Error: Unknown tool 'missing'");
        assert_eq!(tool_messages[1].content, "Error: missing text");
    }

    #[tokio::test]
    async fn test_max_turns_exceeded() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_tool_call("call-0", "upper", serde_json::json!({"text": "again"}));
        provider.queue_tool_call("call-1", "upper", serde_json::json!({"text": "again"}));

        let agent = Agent::new(
            provider.clone(),
            tools_with_upper(),
            AgentConfig::new("looping").with_max_turns(2),
        );
        let err = agent.run("loop").await.unwrap_err();
        assert!(matches!(err, Error::MaxTurnsExceeded { max_turns: 2, .. }));
        assert_eq!(provider.request_count(), 2);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_error(Error::auth("bad key"));
        let agent = Agent::without_tools(provider, AgentConfig::new("empty"));
        assert!(agent.run("hello").await.unwrap_err().is_auth_error());
    }
}
