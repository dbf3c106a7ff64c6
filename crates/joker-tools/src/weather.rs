use async_trait::async_trait;
use serde::Deserialize;

use joker_core::{Error, PropertySchema, Tool, ToolDefinition, ToolOutput, ToolParameters};

/// Canned weather report for the weather demo agent. No service is contacted.
#[derive(Debug, Default, Clone, Copy)]
pub struct WeatherTool;

impl WeatherTool {
    pub fn new() -> Self {
        Self
    }

    pub fn report(location: &str) -> String {
        format!("The weather in {} is cloudy with a high of 15°C.", location)
    }
}

#[derive(Deserialize)]
struct WeatherArgs {
    location: String,
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "get_weather"
    }

    fn description(&self) -> &str {
        "Get the weather for a given location."
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description()).with_parameters(
            ToolParameters::new().add_property(
                "location",
                PropertySchema::string("The location to get the weather for"),
                true,
            ),
        )
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolOutput, Error> {
        let args: WeatherArgs = serde_json::from_value(arguments)
            .map_err(|e| Error::tool(self.name(), format!("Invalid arguments: {}", e)))?;
        Ok(ToolOutput::success(Self::report(&args.location)))
    }
}
