//! Agent definitions for joker.
//!
//! This crate provides:
//! - `AgentDefinition`: one configurable agent as data (prompt + tool names)
//! - Built-in agent personas (joker, weather, get-content, summarizer)
//! - Configuration types for custom agents
//! - Pipeline stages backed by agents (`SummarizeStage`, `GetContentStage`)

use std::sync::Arc;

use joker_core::{Agent, AgentConfig, Error, Provider, ToolRegistry};

mod builtin;
mod config;
mod stages;

pub use builtin::BuiltinAgent;
pub use config::{AgentsConfig, BuiltinAgentOverride, CustomAgentConfig};
pub use stages::{fetch_prompt, summarize_prompt, GetContentStage, SummarizeStage};

/// Default bound on model round-trips for an agent run.
pub const DEFAULT_MAX_TURNS: usize = 10;

/// Everything needed to instantiate an agent, independent of any provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDefinition {
    pub name: String,
    pub description: String,
    pub system_prompt: String,
    /// Names of registry tools the agent may call.
    pub tools: Vec<String>,
    pub max_turns: usize,
}

impl AgentDefinition {
    /// Agent configuration for this definition, optionally pinned to `model`.
    pub fn agent_config(&self, model: Option<&str>) -> AgentConfig {
        let config = AgentConfig::new(&self.name)
            .with_system_prompt(&self.system_prompt)
            .with_max_turns(self.max_turns);
        match model {
            Some(model) => config.with_model(model),
            None => config,
        }
    }

    /// Build a runnable agent, taking its tools from `registry`.
    ///
    /// Fails if the definition names a tool the registry does not hold.
    pub fn build(
        &self,
        provider: Arc<dyn Provider>,
        registry: &ToolRegistry,
        model: Option<&str>,
    ) -> Result<Agent, Error> {
        let tools = registry.subset(&self.tools)?;
        Ok(Agent::new(
            provider,
            Arc::new(tools),
            self.agent_config(model),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use joker_core::testing::MockProvider;
    use joker_core::{Role, Tool, ToolDefinition, ToolOutput};

    struct ShoutTool;

    #[async_trait]
    impl Tool for ShoutTool {
        fn name(&self) -> &str {
            "shout"
        }

        fn description(&self) -> &str {
            "Upper-cases its input"
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(self.name(), self.description())
        }

        async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, Error> {
            let text = arguments["text"].as_str().unwrap_or_default();
            Ok(ToolOutput::success(text.to_uppercase()))
        }
    }

    fn shout_registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(ShoutTool));
        registry
    }

    fn definition(tools: &[&str]) -> AgentDefinition {
        AgentDefinition {
            name: "loud".to_string(),
            description: "Shouts".to_string(),
            system_prompt: "You shout.".to_string(),
            tools: tools.iter().map(|t| t.to_string()).collect(),
            max_turns: 3,
        }
    }

    #[test]
    fn test_agent_config_from_definition() {
        let config = definition(&[]).agent_config(Some("gpt-4o-mini"));
        assert_eq!(config.name, "loud");
        assert_eq!(config.system_prompt.as_deref(), Some("You shout."));
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.max_turns, 3);

        assert!(definition(&[]).agent_config(None).model.is_none());
    }

    #[test]
    fn test_build_rejects_unregistered_tool() {
        let provider = Arc::new(MockProvider::new());
        let result = definition(&["missing"]).build(provider, &shout_registry(), None);
        assert!(matches!(result, Err(Error::Tool { .. })));
    }

    #[tokio::test]
    async fn test_built_agent_calls_its_tools() {
        let provider = Arc::new(MockProvider::new());
        provider.queue_tool_call("call_1", "shout", serde_json::json!({ "text": "ahoy" }));
        provider.queue_response("They said AHOY");

        let agent = definition(&["shout"])
            .build(provider.clone(), &shout_registry(), None)
            .unwrap();
        let answer = agent.run("Shout ahoy").await.unwrap();

        assert_eq!(answer, "They said AHOY");
        let last = provider.last_request().unwrap();
        let tool_message = last
            .messages
            .iter()
            .find(|m| m.role == Role::Tool)
            .unwrap();
        assert_eq!(tool_message.content, "AHOY");
        assert_eq!(last.tools[0].name, "shout");
    }
}
