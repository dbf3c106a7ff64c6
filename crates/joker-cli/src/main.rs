use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use joker_agents::AgentsConfig;

mod commands;
mod config;
mod setup;

use commands::Session;
use config::Config;

/// Log level for tracing output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Most verbose
    Trace,
    /// Verbose: provider requests, tool execution, pipeline transitions
    Debug,
    /// Standard: pipeline run completion
    Info,
    /// Quiet: only warnings and errors
    Warn,
    /// Minimal: only errors
    Error,
}

impl LogLevel {
    fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Parser)]
#[command(name = "joker")]
#[command(author, version, about = "Demo LLM agents and a two-stage website summarizer", long_about = None)]
pub struct Cli {
    /// Provider to use (overrides default_provider in config)
    #[arg(long, global = true)]
    pub provider: Option<String>,

    /// Model to use; for Azure this is the deployment name
    #[arg(short, long, global = true)]
    pub model: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    /// Enable debug logging (shorthand for --log-level debug)
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Write logs to file (JSON-lines format)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the joker agent for a joke
    Joke {
        /// Prompt (default: "Tell me a joke about a pirate")
        prompt: Option<String>,
    },
    /// Ask the weather agent one or more questions
    Weather {
        /// Prompts (default: Seattle, New York and Tokyo questions)
        prompts: Vec<String>,
    },
    /// Fetch and summarize websites
    Summarize {
        /// URLs to summarize (default: https://example.com)
        urls: Vec<String>,

        /// Suppress progress output; print only the summaries
        #[arg(short, long)]
        quiet: bool,

        /// Fetch through the get-content agent instead of directly
        #[arg(long)]
        via_agent: bool,
    },
    /// Fetch a URL and print its extracted text (no model call)
    Fetch { url: String },
    /// Run any built-in or custom agent on a prompt
    Agent { name: String, prompt: String },
    /// List available agents
    Agents,
    /// Show current configuration
    Config,
    /// Initialize configuration files in ~/.config/joker
    Setup,
}

fn init_logging(cli: &Cli) -> Result<()> {
    // --debug overrides --log-level
    let log_level = if cli.debug {
        LogLevel::Debug
    } else {
        cli.log_level
    };
    let filter = EnvFilter::new(log_level.as_filter());

    if let Some(log_path) = &cli.log_file {
        let file = std::fs::File::create(log_path)
            .with_context(|| format!("Failed to create log file: {:?}", log_path))?;
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::sync::Mutex::new(file)))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; variables may come from the real environment.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_logging(&cli)?;

    // Handle setup before config is loaded
    if matches!(cli.command, Commands::Setup) {
        return setup::run();
    }

    let config = Config::load()?;
    let agents = AgentsConfig::load()?;

    let session = || {
        Session::new(
            &config,
            agents.clone(),
            cli.provider.as_deref(),
            cli.model.as_deref(),
        )
    };

    match &cli.command {
        Commands::Joke { prompt } => commands::joke(&session()?, prompt.as_deref()).await,
        Commands::Weather { prompts } => commands::weather(&session()?, prompts).await,
        Commands::Summarize {
            urls,
            quiet,
            via_agent,
        } => commands::summarize(&session()?, urls, *quiet, *via_agent).await,
        Commands::Fetch { url } => commands::fetch(&config, url).await,
        Commands::Agent { name, prompt } => commands::agent(&session()?, name, prompt).await,
        Commands::Agents => commands::list_agents(&agents),
        Commands::Config => commands::show_config(&config),
        Commands::Setup => unreachable!(),
    }
}
