use thiserror::Error;

/// Errors raised by providers, tools and agents.
///
/// Fetch and extraction failures never appear here: the web fetcher folds
/// them into its text output. What does surface is the chat service refusing
/// or failing a request, and local misconfiguration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Chat service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Chat service rejected credentials: {0}")]
    Auth(String),

    #[error("Chat service rate limit hit: {0}")]
    RateLimit(String),

    #[error("Chat service rejected request: {0}")]
    InvalidRequest(String),

    #[error("Could not reach chat service: {0}")]
    Network(String),

    #[error("Chat service timed out: {0}")]
    Timeout(String),

    #[error("Malformed payload: {0}")]
    Serialization(String),

    #[error("Tool {tool} failed: {message}")]
    Tool { tool: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No agent named '{0}'")]
    AgentNotFound(String),

    #[error("Agent {agent} did not finish within {max_turns} turns")]
    MaxTurnsExceeded { agent: String, max_turns: usize },

    #[error("Background task failed: {0}")]
    Task(String),
}

impl Error {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    pub fn rate_limit(message: impl Into<String>) -> Self {
        Self::RateLimit(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout(message.into())
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Auth(_))
    }

    /// True when the chat service itself failed or refused the call.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            Error::Api { .. }
                | Error::Auth(_)
                | Error::RateLimit(_)
                | Error::InvalidRequest(_)
                | Error::Network(_)
                | Error::Timeout(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = Error::api(503, "deployment overloaded");
        assert_eq!(
            err.to_string(),
            "Chat service returned 503: deployment overloaded"
        );
    }

    #[test]
    fn test_max_turns_display() {
        let err = Error::MaxTurnsExceeded {
            agent: "weather".to_string(),
            max_turns: 3,
        };
        assert_eq!(err.to_string(), "Agent weather did not finish within 3 turns");
    }

    #[test]
    fn test_service_error_classification() {
        assert!(Error::auth("invalid key").is_service_error());
        assert!(Error::timeout("30s").is_service_error());
        assert!(Error::api(500, "boom").is_service_error());
        assert!(!Error::tool("get_weather", "missing location").is_service_error());
        assert!(!Error::AgentNotFound("pirate".into()).is_service_error());
        assert!(!Error::Task("panicked".into()).is_service_error());
    }

    #[test]
    fn test_is_auth_error() {
        assert!(Error::auth("invalid key").is_auth_error());
        assert!(!Error::network("connection reset").is_auth_error());
    }

    #[test]
    fn test_from_serde_json() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
