//! Built-in agent personas.

use crate::{AgentDefinition, DEFAULT_MAX_TURNS};

const JOKER_PROMPT: &str = "You are good at telling jokes.";

const WEATHER_PROMPT: &str = "You are a helpful assistant that can provide weather information.";

const GET_CONTENT_PROMPT: &str = "You are an agent that retrieves website content. \nWhen given a URL, use the get_website_content tool to fetch the content and return it.\nExtract and return the main text content from the website.";

const SUMMARIZER_PROMPT: &str = r#"You are an expert content summarizer. Your task is to:
1. Analyze the provided text content
2. Extract the key points and main ideas
3. Create a concise summary in bulleted list format
4. Focus on the most important information
5. Keep each bullet point clear and brief

Format your response as a bulleted list using bullet points (•).
Each bullet should be a complete, standalone point.
Aim for 5-8 key points that capture the essence of the content."#;

/// The agents that ship with joker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinAgent {
    Joker,
    Weather,
    GetContent,
    Summarizer,
}

impl BuiltinAgent {
    pub fn all() -> Vec<Self> {
        vec![Self::Joker, Self::Weather, Self::GetContent, Self::Summarizer]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|agent| agent.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Joker => "joker",
            Self::Weather => "weather",
            Self::GetContent => "get-content",
            Self::Summarizer => "summarizer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Joker => "Tells jokes",
            Self::Weather => "Answers weather questions using the get_weather tool",
            Self::GetContent => "Retrieves the main text of a website using the get_website_content tool",
            Self::Summarizer => "Condenses text into 5-8 bullet points",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            Self::Joker => JOKER_PROMPT,
            Self::Weather => WEATHER_PROMPT,
            Self::GetContent => GET_CONTENT_PROMPT,
            Self::Summarizer => SUMMARIZER_PROMPT,
        }
    }

    pub fn tool_names(&self) -> &'static [&'static str] {
        match self {
            Self::Weather => &["get_weather"],
            Self::GetContent => &["get_website_content"],
            Self::Joker | Self::Summarizer => &[],
        }
    }

    pub fn definition(&self) -> AgentDefinition {
        AgentDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            system_prompt: self.system_prompt().to_string(),
            tools: self.tool_names().iter().map(|t| t.to_string()).collect(),
            max_turns: DEFAULT_MAX_TURNS,
        }
    }
}
