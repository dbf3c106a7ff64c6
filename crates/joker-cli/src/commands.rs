//! Subcommand implementations.

use anyhow::{Context, Result};
use std::sync::Arc;

use joker_agents::{AgentsConfig, BuiltinAgent, GetContentStage, SummarizeStage};
use joker_core::{Pipeline, Provider, Stage, ToolRegistry};
use joker_providers::{AzureOpenAIProvider, OpenAIProvider};
use joker_tools::{builtin_registry, WebFetcher};

use crate::config::{Config, ProviderKind, ResolvedProvider};

pub const DEFAULT_JOKE_PROMPT: &str = "Tell me a joke about a pirate";

pub const DEFAULT_WEATHER_PROMPTS: &[&str] = &[
    "What's the weather like in Seattle?",
    "Can you tell me the weather in New York?",
    "How's the weather in Tokyo today?",
];

pub const DEFAULT_SUMMARIZE_URL: &str = "https://example.com";

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Everything an LLM-backed command needs.
pub struct Session {
    provider: Arc<dyn Provider>,
    registry: ToolRegistry,
    fetcher: WebFetcher,
    agents: AgentsConfig,
    model: Option<String>,
}

impl Session {
    pub fn new(
        config: &Config,
        agents: AgentsConfig,
        provider_override: Option<&str>,
        model_override: Option<&str>,
    ) -> Result<Self> {
        let resolved = config.resolve_provider(provider_override, model_override)?;
        tracing::debug!(
            provider = %resolved.name,
            kind = %resolved.kind,
            model = ?resolved.model,
            "Resolved provider"
        );
        Self::with_provider(create_provider(&resolved)?, config, agents, model_override)
    }

    pub fn with_provider(
        provider: Arc<dyn Provider>,
        config: &Config,
        agents: AgentsConfig,
        model: Option<&str>,
    ) -> Result<Self> {
        let fetcher = create_fetcher(config)?;
        Ok(Self {
            provider,
            registry: builtin_registry(fetcher.clone()),
            fetcher,
            agents,
            model: model.map(str::to_string),
        })
    }

    /// Run the agent called `name` on one prompt.
    pub async fn ask(&self, name: &str, prompt: &str) -> Result<String> {
        let definition = self.agents.resolve(name)?;
        let agent = definition.build(self.provider.clone(), &self.registry, self.model.as_deref())?;
        agent
            .run(prompt)
            .await
            .with_context(|| format!("Agent '{}' failed", name))
    }

    fn summarize_stage(&self) -> Result<SummarizeStage> {
        let definition = self.agents.resolve(BuiltinAgent::Summarizer.name())?;
        let agent = definition.build(self.provider.clone(), &self.registry, self.model.as_deref())?;
        Ok(SummarizeStage::new(agent))
    }
}

pub fn create_provider(resolved: &ResolvedProvider) -> Result<Arc<dyn Provider>> {
    match resolved.kind {
        ProviderKind::Azure => {
            let endpoint = resolved
                .base_url
                .as_deref()
                .context("Azure provider requires an endpoint")?;
            let deployment = resolved
                .model
                .as_deref()
                .context("Azure provider requires a deployment")?;
            Ok(Arc::new(
                AzureOpenAIProvider::new(endpoint, &resolved.api_key, deployment)
                    .with_api_version(&resolved.api_version),
            ))
        }
        ProviderKind::OpenAI => {
            let mut provider = OpenAIProvider::new(&resolved.api_key);
            if let Some(url) = &resolved.base_url {
                provider = provider.with_base_url(url);
            }
            if let Some(model) = &resolved.model {
                provider = provider.with_default_model(model);
            }
            Ok(Arc::new(provider))
        }
    }
}

pub fn create_fetcher(config: &Config) -> Result<WebFetcher> {
    WebFetcher::with_settings(config.fetch.to_settings()).context("Failed to create web fetcher")
}

pub async fn joke(session: &Session, prompt: Option<&str>) -> Result<()> {
    let answer = session
        .ask(BuiltinAgent::Joker.name(), prompt.unwrap_or(DEFAULT_JOKE_PROMPT))
        .await?;
    println!("{}", answer);
    Ok(())
}

pub async fn weather(session: &Session, prompts: &[String]) -> Result<()> {
    let prompts: Vec<&str> = if prompts.is_empty() {
        DEFAULT_WEATHER_PROMPTS.to_vec()
    } else {
        prompts.iter().map(String::as_str).collect()
    };

    println!("{}", rule());
    println!("Weather Agent with Function Calling Demo");
    println!("{}", rule());

    for prompt in prompts {
        println!("\n🔵 User: {}", prompt);
        let answer = session.ask(BuiltinAgent::Weather.name(), prompt).await?;
        println!("🤖 Agent: {}", answer);
    }

    println!("\n{}", rule());
    Ok(())
}

pub async fn summarize(session: &Session, urls: &[String], quiet: bool, via_agent: bool) -> Result<()> {
    let urls: Vec<&str> = if urls.is_empty() {
        vec![DEFAULT_SUMMARIZE_URL]
    } else {
        urls.iter().map(String::as_str).collect()
    };

    println!("{}", rule());
    println!("Website Summarizer - Multi-Agent Workflow Demo");
    println!("{}", rule());
    println!();

    let summarizer = session.summarize_stage()?;
    if via_agent {
        let fetch = GetContentStage::with_provider(
            session.provider.clone(),
            &session.registry,
            session.model.as_deref(),
        )?;
        summarize_urls(&Pipeline::new(fetch, summarizer), &urls, !quiet).await;
    } else {
        summarize_urls(&Pipeline::new(session.fetcher.clone(), summarizer), &urls, !quiet).await;
    }
    Ok(())
}

/// Run the pipeline for each URL; a failure is reported and the next URL still runs.
async fn summarize_urls<F, S>(pipeline: &Pipeline<F, S>, urls: &[&str], verbose: bool)
where
    F: Stage<Input = String, Output = String>,
    S: Stage<Input = String, Output = String>,
{
    for url in urls {
        match pipeline.run(url, verbose).await {
            Ok(summary) => {
                println!("📋 Summary:");
                println!("{}", summary);
                println!();
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Summarizer run failed");
                println!("❌ Error processing {}: {}", url, e);
            }
        }
        println!("{}", rule());
        println!();
    }
}

pub async fn fetch(config: &Config, url: &str) -> Result<()> {
    let fetcher = create_fetcher(config)?;
    println!("{}", fetcher.fetch(url).await);
    Ok(())
}

pub async fn agent(session: &Session, name: &str, prompt: &str) -> Result<()> {
    println!("{}", session.ask(name, prompt).await?);
    Ok(())
}

pub fn list_agents(agents: &AgentsConfig) -> Result<()> {
    println!("Agents:");
    for def in agents.definitions() {
        let origin = if agents.get(&def.name).is_some() {
            "custom"
        } else {
            "built-in"
        };
        println!("  {} ({}) - {}", def.name, origin, def.description);
        if !def.tools.is_empty() {
            println!("    Tools: {}", def.tools.join(", "));
        }
        println!("    Max turns: {}", def.max_turns);
    }
    Ok(())
}

pub fn show_config(config: &Config) -> Result<()> {
    println!("Configuration:");
    if let Ok(path) = Config::config_path() {
        println!("  File: {}", path.display());
    }
    println!("  Default provider: {}", config.default_provider);

    println!("\nProviders:");
    if config.providers.is_empty() {
        println!("  (none configured; azure reads AZURE_OPENAI_* from the environment)");
    }
    let mut names: Vec<_> = config.providers.keys().collect();
    names.sort();
    for name in names {
        let entry = &config.providers[name];
        println!("  {}:", name);
        if let Some(kind) = entry.provider_type {
            println!("    Type: {}", kind);
        }
        if let Some(base_url) = &entry.base_url {
            println!("    Base URL: {}", base_url);
        }
        if let Some(model) = &entry.default_model {
            println!("    Default model: {}", model);
        }
        if let Some(version) = &entry.api_version {
            println!("    API version: {}", version);
        }
        if entry.api_key.is_some() {
            println!("    API key: (configured)");
        }
    }

    println!("\nFetch:");
    println!("  Timeout: {}s", config.fetch.timeout_secs);
    println!("  Max content length: {} characters", config.fetch.max_content_length);
    println!("  User agent: {}", config.fetch.user_agent);
    Ok(())
}
