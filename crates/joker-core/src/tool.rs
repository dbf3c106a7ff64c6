use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: ToolParameters,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: ToolParameters::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: ToolParameters) -> Self {
        self.parameters = parameters;
        self
    }
}

/// JSON-schema object describing a tool's arguments.
///
/// Properties are kept sorted so the schema sent to the model is stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameters {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: BTreeMap<String, PropertySchema>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(rename = "additionalProperties", default)]
    pub additional_properties: bool,
}

impl Default for ToolParameters {
    fn default() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
            additional_properties: false,
        }
    }
}

impl ToolParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_property(
        mut self,
        name: impl Into<String>,
        schema: PropertySchema,
        required: bool,
    ) -> Self {
        let name = name.into();
        self.properties.insert(name.clone(), schema);
        if required {
            self.required.push(name);
        }
        self
    }
}

/// Schema for a single argument. Every tool here takes string arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertySchema {
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            schema_type: "string".to_string(),
            description: Some(description.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

/// A capability the model may ask to invoke mid-conversation.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn definition(&self) -> ToolDefinition;

    async fn execute(&self, arguments: Value) -> Result<ToolOutput, Error>;
}

/// Lookup table of tools by name, handed to the generation call.
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Build a registry holding only the named tools.
    ///
    /// Fails on the first name that is not registered here.
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> Result<ToolRegistry, Error> {
        let mut subset = ToolRegistry::new();
        for name in names {
            let name = name.as_ref();
            let tool = self
                .tools
                .get(name)
                .ok_or_else(|| Error::tool(name, "Tool is not registered"))?;
            subset.register(Arc::clone(tool));
        }
        Ok(subset)
    }

    /// Tool definitions sorted by name so requests are deterministic.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions: Vec<_> = self.tools.values().map(|t| t.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the text argument"
        }

        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(self.name(), self.description()).with_parameters(
                ToolParameters::new().add_property("text", PropertySchema::string("Text"), true),
            )
        }

        async fn execute(&self, arguments: Value) -> Result<ToolOutput, Error> {
            Ok(ToolOutput::success(arguments["text"].as_str().unwrap_or_default()))
        }
    }

    #[test]
    fn test_tool_definition() {
        let def = ToolDefinition::new("get_weather", "Get the weather for a location")
            .with_parameters(
                ToolParameters::new()
                    .add_property("location", PropertySchema::string("City name"), true),
            );

        assert_eq!(def.name, "get_weather");
        assert!(def.parameters.required.contains(&"location".to_string()));
    }

    #[test]
    fn test_parameters_serialize_as_json_schema() {
        let params = ToolParameters::new().add_property("url", PropertySchema::string("URL"), true);
        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["url"]["type"], "string");
        assert_eq!(value["required"][0], "url");
        assert_eq!(value["additionalProperties"], false);
    }

    #[test]
    fn test_tool_output() {
        assert!(!ToolOutput::success("done").is_error);
        assert!(ToolOutput::error("failed").is_error);
    }

    #[tokio::test]
    async fn test_registry_lookup_and_execute() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["echo"]);

        let tool = registry.get("echo").unwrap();
        let output = tool.execute(serde_json::json!({"text": "hi"})).await.unwrap();
        assert_eq!(output.content, "hi");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_registry_subset() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool));

        let subset = registry.subset(&["echo"]).unwrap();
        assert_eq!(subset.len(), 1);

        let empty = registry.subset::<&str>(&[]).unwrap();
        assert!(empty.is_empty());

        let err = registry.subset(&["nope"]).err().unwrap();
        assert!(err.to_string().contains("nope"));
    }
}
