//! joker-tools: Built-in tools for joker
//!
//! This crate provides:
//! - Decode: charset detection for fetched pages
//! - Extract: HTML to cleaned, bounded plain text
//! - Web: the fetch stage and the `get_website_content` tool
//! - Weather: the canned `get_weather` demo tool

pub mod decode;
pub mod extract;
pub mod weather;
pub mod web;

pub use decode::decode_html;
pub use extract::{extract_text, DEFAULT_MAX_CONTENT_LENGTH, TRUNCATION_MARKER};
pub use weather::WeatherTool;
pub use web::{
    create_web_tools, FetchSettings, FetchWebpageTool, WebFetcher, BROWSER_USER_AGENT,
    DEFAULT_FETCH_TIMEOUT,
};

use std::sync::Arc;

use joker_core::{Tool, ToolRegistry};

/// Create every built-in tool.
pub fn create_builtin_tools(fetcher: WebFetcher) -> Vec<Arc<dyn Tool>> {
    let mut tools = create_web_tools(fetcher);
    tools.push(Arc::new(WeatherTool::new()));
    tools
}

/// Registry holding every built-in tool.
pub fn builtin_registry(fetcher: WebFetcher) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in create_builtin_tools(fetcher) {
        registry.register(tool);
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_names() {
        let registry = builtin_registry(WebFetcher::new().unwrap());
        assert_eq!(registry.names(), vec!["get_weather", "get_website_content"]);
    }

    #[test]
    fn test_builtin_subset() {
        let registry = builtin_registry(WebFetcher::new().unwrap());
        let subset = registry.subset(&["get_website_content"]).unwrap();
        assert_eq!(subset.len(), 1);
        assert!(subset.get("get_weather").is_none());
    }
}
