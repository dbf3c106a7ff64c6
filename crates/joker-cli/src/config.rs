use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use joker_providers::azure::DEFAULT_API_VERSION;
use joker_tools::{FetchSettings, BROWSER_USER_AGENT, DEFAULT_MAX_CONTENT_LENGTH};

/// Prefix for environment overrides, e.g. `JOKER_FETCH__TIMEOUT_SECS=5`.
const ENV_PREFIX: &str = "JOKER_";

const AZURE_ENDPOINT_VAR: &str = "AZURE_OPENAI_ENDPOINT";
const AZURE_DEPLOYMENT_VAR: &str = "AZURE_OPENAI_CHAT_DEPLOYMENT_NAME";
const AZURE_API_KEY_VAR: &str = "AZURE_OPENAI_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider used when `--provider` is not given
    #[serde(default = "default_provider")]
    pub default_provider: String,

    #[serde(default)]
    pub providers: HashMap<String, ProviderConfigEntry>,

    #[serde(default)]
    pub fetch: FetchConfigEntry,
}

fn default_provider() -> String {
    "azure".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: HashMap::new(),
            fetch: FetchConfigEntry::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Azure,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::OpenAI => write!(f, "openai"),
            ProviderKind::Azure => write!(f, "azure"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProviderConfigEntry {
    /// Provider type; inferred from the section name or base_url when absent
    #[serde(default, rename = "type")]
    pub provider_type: Option<ProviderKind>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// API base URL, or the resource endpoint for Azure
    #[serde(default, alias = "endpoint")]
    pub base_url: Option<String>,

    /// Model name, or the deployment name for Azure
    #[serde(default, alias = "deployment")]
    pub default_model: Option<String>,

    /// Azure API version
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Web fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfigEntry {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Character budget for extracted page text
    #[serde(default = "default_max_content_length")]
    pub max_content_length: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_content_length() -> usize {
    DEFAULT_MAX_CONTENT_LENGTH
}

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.to_string()
}

impl Default for FetchConfigEntry {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_content_length: default_max_content_length(),
            user_agent: default_user_agent(),
        }
    }
}

impl FetchConfigEntry {
    pub fn to_settings(&self) -> FetchSettings {
        FetchSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
            max_content_length: self.max_content_length,
        }
    }
}

impl Config {
    /// Load defaults, then ~/.config/joker/config.toml, then `JOKER_` env vars.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        Self::figment(path)
            .extract()
            .with_context(|| format!("Invalid configuration (file: {})", path.display()))
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("joker"))
    }

    /// Resolve the provider to use, reading fallbacks from the process environment.
    pub fn resolve_provider(
        &self,
        provider_override: Option<&str>,
        model_override: Option<&str>,
    ) -> Result<ResolvedProvider> {
        self.resolve_provider_with_env(provider_override, model_override, |key| {
            std::env::var(key).ok()
        })
    }

    /// Resolve the provider to use, with `env` standing in for the environment.
    ///
    /// Config values win over environment fallbacks; `model_override` wins over both.
    pub fn resolve_provider_with_env<E>(
        &self,
        provider_override: Option<&str>,
        model_override: Option<&str>,
        env: E,
    ) -> Result<ResolvedProvider>
    where
        E: Fn(&str) -> Option<String>,
    {
        let name = provider_override.unwrap_or(&self.default_provider);

        let entry = match self.providers.get(name) {
            Some(entry) => entry.clone(),
            None if matches!(name, "azure" | "openai") => ProviderConfigEntry::default(),
            None => anyhow::bail!(
                "Provider '{}' not found in config. Add a [providers.{}] section to {}",
                name,
                name,
                Self::config_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|_| "config.toml".to_string())
            ),
        };

        let kind = resolve_provider_type(entry.provider_type, name, entry.base_url.as_deref());

        let name_key_var = format!("{}_API_KEY", name.to_uppercase().replace('-', "_"));
        let mut api_key = entry.api_key.clone().or_else(|| env(&name_key_var));
        let mut base_url = entry.base_url.clone();
        let mut model = model_override
            .map(str::to_string)
            .or_else(|| entry.default_model.clone());

        if kind == ProviderKind::Azure {
            api_key = api_key.or_else(|| env(AZURE_API_KEY_VAR));
            base_url = base_url.or_else(|| env(AZURE_ENDPOINT_VAR));
            model = model.or_else(|| env(AZURE_DEPLOYMENT_VAR));
        }

        let api_key = api_key.with_context(|| match kind {
            ProviderKind::Azure => format!(
                "API key not found for provider '{}'. Set {} or api_key in config",
                name, AZURE_API_KEY_VAR
            ),
            ProviderKind::OpenAI => format!(
                "API key not found for provider '{}'. Set {} or api_key in config",
                name, name_key_var
            ),
        })?;

        if kind == ProviderKind::Azure {
            if base_url.is_none() {
                anyhow::bail!(
                    "Azure endpoint not set for provider '{}'. Set {} or base_url in config",
                    name,
                    AZURE_ENDPOINT_VAR
                );
            }
            if model.is_none() {
                anyhow::bail!(
                    "Azure deployment not set for provider '{}'. Set {}, default_model in config, or pass --model",
                    name,
                    AZURE_DEPLOYMENT_VAR
                );
            }
        }

        Ok(ResolvedProvider {
            name: name.to_string(),
            kind,
            api_key,
            base_url,
            model,
            api_version: entry
                .api_version
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        })
    }
}

/// Everything needed to construct a provider client.
#[derive(Debug, Clone)]
pub struct ResolvedProvider {
    pub name: String,
    pub kind: ProviderKind,
    pub api_key: String,
    pub base_url: Option<String>,
    /// Model name, or the deployment for Azure
    pub model: Option<String>,
    pub api_version: String,
}

/// Resolve the provider type from explicit config, provider name, or base_url.
///
/// Priority:
/// 1. Explicit `type` in provider config always wins
/// 2. A name or base_url mentioning Azure selects Azure
/// 3. Anything else is OpenAI-compatible
pub fn resolve_provider_type(
    explicit_type: Option<ProviderKind>,
    provider_name: &str,
    base_url: Option<&str>,
) -> ProviderKind {
    if let Some(kind) = explicit_type {
        return kind;
    }

    let name = provider_name.to_lowercase();
    let azure_url = base_url.is_some_and(|url| url.to_lowercase().contains(".openai.azure.com"));
    if name.contains("azure") || azure_url {
        ProviderKind::Azure
    } else {
        ProviderKind::OpenAI
    }
}
