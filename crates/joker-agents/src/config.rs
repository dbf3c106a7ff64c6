//! Configuration types for agents.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use joker_core::Error;

use crate::{AgentDefinition, BuiltinAgent, DEFAULT_MAX_TURNS};

fn default_max_turns() -> usize {
    DEFAULT_MAX_TURNS
}

/// Configuration overrides for built-in agents.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BuiltinAgentOverride {
    /// Maximum agentic loop iterations (number of turns)
    #[serde(default)]
    pub max_turns: Option<usize>,
}

/// Custom agent definition from agents.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomAgentConfig {
    /// Short description for display (`joker agents`)
    pub description: String,

    /// System prompt for the agent
    pub system_prompt: String,

    /// Tool names this agent can use (from the tool registry)
    #[serde(default)]
    pub tools: Vec<String>,

    /// Maximum agentic loop iterations
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
}

impl CustomAgentConfig {
    pub fn to_definition(&self, name: &str) -> AgentDefinition {
        AgentDefinition {
            name: name.to_string(),
            description: self.description.clone(),
            system_prompt: self.system_prompt.clone(),
            tools: self.tools.clone(),
            max_turns: self.max_turns,
        }
    }
}

/// Agents configuration file (agents.toml).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AgentsConfig {
    /// Custom agent definitions
    #[serde(default)]
    pub agents: HashMap<String, CustomAgentConfig>,

    /// Overrides for built-in agents
    #[serde(default)]
    pub builtin: HashMap<String, BuiltinAgentOverride>,
}

impl AgentsConfig {
    /// Load agents configuration from ~/.config/joker/agents.toml.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load agents configuration from `path`; a missing file yields an empty config.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Get the path to the agents config file.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("joker").join("agents.toml"))
    }

    /// Get a custom agent by name.
    pub fn get(&self, name: &str) -> Option<&CustomAgentConfig> {
        self.agents.get(name)
    }

    /// Get max_turns for a built-in agent from config overrides.
    pub fn get_builtin_max_turns(&self, name: &str) -> Option<usize> {
        self.builtin.get(name).and_then(|o| o.max_turns)
    }

    /// Resolve `name` to a definition.
    ///
    /// A custom agent shadows a built-in of the same name. Built-ins pick up
    /// their `[builtin.<name>]` overrides.
    pub fn resolve(&self, name: &str) -> Result<AgentDefinition, Error> {
        if let Some(custom) = self.get(name) {
            return Ok(custom.to_definition(name));
        }

        let builtin = BuiltinAgent::from_name(name)
            .ok_or_else(|| Error::AgentNotFound(name.to_string()))?;
        Ok(self.apply_override(builtin.definition()))
    }

    /// Every available agent: built-ins first, then custom agents by name.
    pub fn definitions(&self) -> Vec<AgentDefinition> {
        let mut defs: Vec<AgentDefinition> = BuiltinAgent::all()
            .into_iter()
            .filter(|b| !self.agents.contains_key(b.name()))
            .map(|b| self.apply_override(b.definition()))
            .collect();

        let mut custom: Vec<_> = self
            .agents
            .iter()
            .map(|(name, agent)| agent.to_definition(name))
            .collect();
        custom.sort_by(|a, b| a.name.cmp(&b.name));

        defs.extend(custom);
        defs
    }

    fn apply_override(&self, mut def: AgentDefinition) -> AgentDefinition {
        if let Some(max_turns) = self.get_builtin_max_turns(&def.name) {
            def.max_turns = max_turns;
        }
        def
    }
}
