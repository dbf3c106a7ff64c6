//! Pipeline stages backed by agents.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use joker_core::{Agent, Error, Provider, Stage, ToolRegistry};

use crate::BuiltinAgent;

/// User prompt sent to the summarizer.
pub fn summarize_prompt(content: &str) -> String {
    format!(
        "Please summarize the following content into a concise bulleted list:\n\n{}",
        content
    )
}

/// User prompt sent to the get-content agent.
pub fn fetch_prompt(url: &str) -> String {
    format!("Please fetch and return the content from this URL: {}", url)
}

/// Turns arbitrary text into a bulleted digest.
///
/// The digest is whatever the model produced; bullet count and format are
/// not checked. An empty model response yields an empty digest.
pub struct SummarizeStage {
    agent: Agent,
}

impl SummarizeStage {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    /// Summarizer built from the built-in persona, without tools.
    pub fn with_provider(provider: Arc<dyn Provider>, model: Option<&str>) -> Self {
        let config = BuiltinAgent::Summarizer.definition().agent_config(model);
        Self::new(Agent::without_tools(provider, config))
    }

    pub async fn summarize(&self, content: &str) -> Result<String, Error> {
        debug!(agent = %self.agent.name(), content_chars = content.chars().count(), "Summarizing");
        self.agent.run(&summarize_prompt(content)).await
    }
}

#[async_trait]
impl Stage for SummarizeStage {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "Summarize Content Agent"
    }

    async fn run(&self, content: String) -> Result<String, Error> {
        self.summarize(&content).await
    }
}

/// Fetch stage that asks the get-content agent to retrieve the page via its tool.
///
/// Unlike the direct fetcher, the returned text is the model's rendition of
/// the tool output and may be reworded or shortened.
pub struct GetContentStage {
    agent: Agent,
}

impl GetContentStage {
    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    /// Build from the built-in persona. `registry` must hold `get_website_content`.
    pub fn with_provider(
        provider: Arc<dyn Provider>,
        registry: &ToolRegistry,
        model: Option<&str>,
    ) -> Result<Self, Error> {
        let agent = BuiltinAgent::GetContent
            .definition()
            .build(provider, registry, model)?;
        Ok(Self::new(agent))
    }

    pub async fn fetch(&self, url: &str) -> Result<String, Error> {
        self.agent.run(&fetch_prompt(url)).await
    }
}

#[async_trait]
impl Stage for GetContentStage {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "Get Content Agent"
    }

    async fn run(&self, url: String) -> Result<String, Error> {
        self.fetch(&url).await
    }
}
