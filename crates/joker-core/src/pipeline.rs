//! Two-stage sequential pipeline.
//!
//! A run moves through `AwaitingFetch -> AwaitingSummarize -> Done`. The fetch
//! stage output is handed to the summarize stage as-is: an error string coming
//! out of the fetch stage is summarized like any other content.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::Error;

/// Number of characters shown in the verbose content preview.
const PREVIEW_CHARS: usize = 100;

/// One step of a pipeline.
#[async_trait]
pub trait Stage: Send + Sync {
    type Input: Send + 'static;
    type Output: Send + 'static;

    /// Human-readable stage name used in progress notices.
    fn name(&self) -> &str;

    async fn run(&self, input: Self::Input) -> Result<Self::Output, Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    AwaitingFetch,
    AwaitingSummarize,
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::AwaitingFetch => write!(f, "awaiting_fetch"),
            PipelineState::AwaitingSummarize => write!(f, "awaiting_summarize"),
            PipelineState::Done => write!(f, "done"),
        }
    }
}

/// Progress notices emitted by a verbose run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Started { url: String },
    FetchStarted { stage: String },
    FetchCompleted { chars: usize, preview: String },
    SummarizeStarted { stage: String },
    SummarizeCompleted { chars: usize },
}

/// Receives progress notices. Purely observational.
#[async_trait]
pub trait PipelineProgressHandler: Send + Sync {
    async fn on_progress(&self, event: PipelineEvent);
}

/// Prints progress notices to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

#[async_trait]
impl PipelineProgressHandler for ConsoleProgress {
    async fn on_progress(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::Started { url } => println!("🌐 URL: {}\n", url),
            PipelineEvent::FetchStarted { stage } => {
                println!("📥 Step 1: {} - Fetching website content...", stage)
            }
            PipelineEvent::FetchCompleted { chars, preview } => {
                println!("✓ Content retrieved successfully ({} characters)", chars);
                println!("   Preview: {}\n", preview);
            }
            PipelineEvent::SummarizeStarted { stage } => {
                println!("📝 Step 2: {} - Creating summary...", stage)
            }
            PipelineEvent::SummarizeCompleted { .. } => println!("✓ Summary generated\n"),
        }
    }
}

/// First `PREVIEW_CHARS` characters of `content`, with `...` appended when cut.
pub fn content_preview(content: &str) -> String {
    match content.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &content[..idx]),
        None => content.to_string(),
    }
}

/// Fetch stage followed by summarize stage, connected by a single text handoff.
pub struct Pipeline<F, S> {
    fetch: F,
    summarize: S,
    progress: Option<Arc<dyn PipelineProgressHandler>>,
}

impl<F, S> Pipeline<F, S>
where
    F: Stage<Input = String, Output = String>,
    S: Stage<Input = String, Output = String>,
{
    pub fn new(fetch: F, summarize: S) -> Self {
        Self {
            fetch,
            summarize,
            progress: None,
        }
    }

    /// Route verbose notices to `handler` instead of stdout.
    pub fn with_progress(mut self, handler: Arc<dyn PipelineProgressHandler>) -> Self {
        self.progress = Some(handler);
        self
    }

    pub fn fetch_stage(&self) -> &F {
        &self.fetch
    }

    pub fn summarize_stage(&self) -> &S {
        &self.summarize
    }

    /// Fetch `url`, summarize whatever came back, and return the digest.
    ///
    /// With `verbose` set, progress notices are emitted before and after each
    /// stage; they never influence the returned digest.
    pub async fn run(&self, url: &str, verbose: bool) -> Result<String, Error> {
        let reporter: Option<&dyn PipelineProgressHandler> = if verbose {
            Some(self.progress.as_deref().unwrap_or(&ConsoleProgress))
        } else {
            None
        };

        debug!(state = %PipelineState::AwaitingFetch, url = %url, "Pipeline run starting");
        if let Some(r) = reporter {
            r.on_progress(PipelineEvent::Started {
                url: url.to_string(),
            })
            .await;
            r.on_progress(PipelineEvent::FetchStarted {
                stage: self.fetch.name().to_string(),
            })
            .await;
        }

        let content = self.fetch.run(url.to_string()).await?;
        let content_chars = content.chars().count();

        debug!(
            state = %PipelineState::AwaitingSummarize,
            content_chars = content_chars,
            "Fetch stage finished"
        );
        if let Some(r) = reporter {
            r.on_progress(PipelineEvent::FetchCompleted {
                chars: content_chars,
                preview: content_preview(&content),
            })
            .await;
            r.on_progress(PipelineEvent::SummarizeStarted {
                stage: self.summarize.name().to_string(),
            })
            .await;
        }

        let digest = self.summarize.run(content).await?;

        info!(
            state = %PipelineState::Done,
            url = %url,
            digest_chars = digest.chars().count(),
            "Pipeline run finished"
        );
        if let Some(r) = reporter {
            r.on_progress(PipelineEvent::SummarizeCompleted {
                chars: digest.chars().count(),
            })
            .await;
        }

        Ok(digest)
    }
}
