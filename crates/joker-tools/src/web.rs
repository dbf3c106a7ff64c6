//! Website fetching: the fetch stage of the summarizer pipeline and the
//! `get_website_content` tool.
//!
//! Fetch failures never surface as errors. They come back as text starting
//! with `Error fetching URL:` or `Error processing content:` so that callers
//! downstream can treat every outcome as content.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use joker_core::{
    run_blocking, Error, PropertySchema, Stage, Tool, ToolDefinition, ToolOutput, ToolParameters,
};

use crate::decode::decode_html;
use crate::extract::{extract_text, DEFAULT_MAX_CONTENT_LENGTH};

/// Desktop browser identity sent with every fetch.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Knobs for [`WebFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
    /// Character budget for extracted text.
    pub max_content_length: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: BROWSER_USER_AGENT.to_string(),
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}

/// Retrieves pages over HTTP and reduces them to cleaned text.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Clone)]
pub struct WebFetcher {
    client: Client,
    settings: FetchSettings,
}

impl WebFetcher {
    pub fn new() -> Result<Self, Error> {
        Self::with_settings(FetchSettings::default())
    }

    pub fn with_settings(settings: FetchSettings) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Fetch `url` and return its cleaned text, or an error description.
    pub async fn fetch(&self, url: &str) -> String {
        debug!(url = %url, "Fetching page");

        let (content_type, body) = match self.download(url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = %url, error = %e, "Fetch failed");
                return format!("Error fetching URL: {}", e);
            }
        };

        let max_length = self.settings.max_content_length;
        process_off_thread(url, move || {
            extract_text(&decode_html(&body, content_type.as_deref()), max_length)
        })
        .await
    }

    /// GET `url`, returning the `Content-Type` header and the undecoded body.
    async fn download(&self, url: &str) -> Result<(Option<String>, Vec<u8>), reqwest::Error> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;
        Ok((content_type, body.to_vec()))
    }
}

/// Run page processing on the blocking pool; a failed task becomes error text.
async fn process_off_thread<F>(url: &str, work: F) -> String
where
    F: FnOnce() -> String + Send + 'static,
{
    match run_blocking(work).await {
        Ok(text) => {
            debug!(url = %url, chars = text.chars().count(), "Page text extracted");
            text
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Extraction failed");
            format!("Error processing content: {}", e)
        }
    }
}

#[async_trait]
impl Stage for WebFetcher {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "Get Content"
    }

    async fn run(&self, url: String) -> Result<String, Error> {
        Ok(self.fetch(&url).await)
    }
}

// =============================================================================
// Fetch Webpage Tool
// =============================================================================

pub struct FetchWebpageTool {
    fetcher: WebFetcher,
}

impl FetchWebpageTool {
    pub fn new(fetcher: WebFetcher) -> Self {
        Self { fetcher }
    }
}

#[derive(Deserialize)]
struct FetchWebpageArgs {
    url: String,
}

#[async_trait]
impl Tool for FetchWebpageTool {
    fn name(&self) -> &str {
        "get_website_content"
    }

    fn description(&self) -> &str {
        "Fetch a website and return its main text content with scripts, styles and navigation removed."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new().add_property(
                "url",
                PropertySchema::string("The URL of the website to fetch"),
                true,
            ),
        )
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, Error> {
        let args: FetchWebpageArgs = serde_json::from_value(arguments)
            .map_err(|e| Error::tool(self.name(), format!("Invalid arguments: {}", e)))?;

        Ok(ToolOutput::success(self.fetcher.fetch(&args.url).await))
    }
}

pub fn create_web_tools(fetcher: WebFetcher) -> Vec<Arc<dyn Tool>> {
    vec![Arc::new(FetchWebpageTool::new(fetcher))]
}
