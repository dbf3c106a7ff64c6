use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const CONFIG_TEMPLATE: &str = r#"# joker configuration
#
# Values here can be overridden with JOKER_-prefixed environment variables,
# using "__" for nesting, e.g. JOKER_FETCH__TIMEOUT_SECS=5.
# A .env file in the working directory is loaded first.

default_provider = "azure"

# ── Providers ────────────────────────────────────────────────────
# Provider type is auto-detected from the section name or base_url.

# Azure OpenAI. When unset, these fall back to the environment:
#   AZURE_OPENAI_ENDPOINT, AZURE_OPENAI_CHAT_DEPLOYMENT_NAME, AZURE_OPENAI_API_KEY
[providers.azure]
# endpoint = "https://<resource>.openai.azure.com"
# deployment = "gpt-4o"
# api_version = "2024-10-21"
# api_key = "..."                 # or set AZURE_OPENAI_API_KEY env var

# [providers.openai]
# api_key = "sk-..."              # or set OPENAI_API_KEY env var
# default_model = "gpt-4o-mini"

# Any OpenAI-compatible server
# [providers.local]
# type = "openai"
# base_url = "http://localhost:11434/v1"
# default_model = "llama3.1"
# api_key = "unused"

# ── Web fetch ────────────────────────────────────────────────────
[fetch]
timeout_secs = 10
max_content_length = 8000
# user_agent = "Mozilla/5.0 ..."
"#;

const AGENTS_TEMPLATE: &str = r#"# joker agent configuration (optional)
#
# Override built-in agent settings or define custom agents.
#
# Built-in agents: joker, weather, get-content, summarizer
# Tools available to agents: get_weather, get_website_content

# Example: cap the weather agent's tool loop
# [builtin.weather]
# max_turns = 3

# Example: a custom agent
# [agents.pirate]
# description = "Answers like a pirate"
# system_prompt = "You are a pirate. Answer every question in pirate speak."
# tools = ["get_weather"]
"#;

pub fn run() -> Result<()> {
    let config_dir = crate::config::Config::config_dir()?;

    let config_path = config_dir.join("config.toml");
    let agents_path = config_dir.join("agents.toml");

    let config_exists = config_path.exists();
    let agents_exists = agents_path.exists();

    if config_exists || agents_exists {
        println!("Existing config files found:");
        if config_exists {
            println!("  {}", config_path.display());
        }
        if agents_exists {
            println!("  {}", agents_path.display());
        }
        print!("\nOverwrite? (Existing files will be backed up) [y/N] ");

        // Flush stdout so the prompt appears before reading
        use std::io::Write;
        std::io::stdout().flush()?;

        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Setup cancelled.");
            return Ok(());
        }
    }

    for path in write_templates(&config_dir)? {
        println!("Created {}", path.display());
    }

    println!("\nNext steps:");
    println!("  1. Point joker at Azure:  export AZURE_OPENAI_ENDPOINT=... AZURE_OPENAI_CHAT_DEPLOYMENT_NAME=... AZURE_OPENAI_API_KEY=...");
    println!("  2. Tell a joke:           joker joke");
    println!("  3. Summarize a website:   joker summarize https://example.com");

    Ok(())
}

/// Write both templates into `dir`, backing up any files they replace.
fn write_templates(dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

    let mut written = Vec::new();
    for (name, template) in [("config.toml", CONFIG_TEMPLATE), ("agents.toml", AGENTS_TEMPLATE)] {
        let path = dir.join(name);
        if path.exists() {
            backup_file(&path)?;
        }
        std::fs::write(&path, template)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

/// Back up a file to <name>.bak, appending a counter if that is taken.
fn backup_file(path: &Path) -> Result<PathBuf> {
    let mut backup = path.with_extension("toml.bak");
    let mut counter = 1;
    while backup.exists() {
        backup = path.with_extension(format!("toml.bak.{}", counter));
        counter += 1;
    }

    std::fs::rename(path, &backup)
        .with_context(|| format!("Failed to back up {} to {}", path.display(), backup.display()))?;
    println!("  Backed up to {}", backup.display());

    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use joker_agents::AgentsConfig;

    #[test]
    fn test_templates_parse() {
        // Inside a jail so concurrent env-var tests cannot leak into the load.
        figment::Jail::expect_with(|jail| {
            write_templates(jail.directory()).map_err(|e| e.to_string())?;

            let config = Config::load_from(&jail.directory().join("config.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(config.default_provider, "azure");
            assert!(config.providers.contains_key("azure"));
            assert_eq!(config.fetch.timeout_secs, 10);

            let agents = AgentsConfig::load_from(&jail.directory().join("agents.toml"))
                .map_err(|e| e.to_string())?;
            assert!(agents.agents.is_empty());
            Ok(())
        });
    }

    #[test]
    fn test_existing_files_are_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        std::fs::write(&config_path, "default_provider = \"openai\"\n").unwrap();

        write_templates(dir.path()).unwrap();
        write_templates(dir.path()).unwrap();

        let first_backup = dir.path().join("config.toml.bak");
        assert_eq!(
            std::fs::read_to_string(&first_backup).unwrap(),
            "default_provider = \"openai\"\n"
        );
        assert!(dir.path().join("config.toml.bak.1").exists());
        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), CONFIG_TEMPLATE);
    }
}
