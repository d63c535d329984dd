use jsonschema::{Draft, JSONSchema};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use super::amap::{self, AmapClient};

type Handler = Box<
    dyn for<'a> Fn(
            &'a Value,
            &'a AmapClient,
        ) -> Pin<Box<dyn Future<Output = Result<String, String>> + Send + 'a>>
        + Send
        + Sync,
>;

pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub handler: Handler,
}

/// Map tools exposed to the model through the function-calling API.
/// Arguments are validated against each tool's JSON schema before the
/// handler runs.
pub struct ToolRegistry {
    tools: HashMap<String, Tool>,
    amap: AmapClient,
}

impl ToolRegistry {
    pub fn new(amap: AmapClient) -> Self {
        let mut registry = Self {
            tools: HashMap::new(),
            amap,
        };
        registry.register_map_tools();
        registry
    }

    fn register(&mut self, tool: Tool) {
        self.tools.insert(tool.name.clone(), tool);
    }

    fn register_map_tools(&mut self) {
        self.register(Tool {
            name: "maps_weather".to_string(),
            description: "Look up the weather for a city, including the forecast for the \
                          next few days."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "City name or adcode, e.g. Beijing or 110000"
                    }
                },
                "required": ["city"],
                "additionalProperties": false
            }),
            handler: Box::new(|args, client| {
                let args = args.clone();
                let client = client.clone();
                Box::pin(async move { amap::weather(&client, &args).await })
            }),
        });

        self.register(Tool {
            name: "maps_geocode".to_string(),
            description: "Convert an address into coordinates.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "address": {
                        "type": "string",
                        "description": "Address to resolve, e.g. Wangjing SOHO, Chaoyang, Beijing"
                    },
                    "city": {
                        "type": "string",
                        "description": "Optional city to narrow the search"
                    }
                },
                "required": ["address"],
                "additionalProperties": false
            }),
            handler: Box::new(|args, client| {
                let args = args.clone();
                let client = client.clone();
                Box::pin(async move { amap::geocode(&client, &args).await })
            }),
        });

        self.register(Tool {
            name: "maps_around_search".to_string(),
            description: "Search for points of interest around a coordinate.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "keywords": {
                        "type": "string",
                        "description": "What to look for, e.g. cinema or restaurants"
                    },
                    "location": {
                        "type": "string",
                        "description": "Center coordinate as lng,lat, e.g. 116.466485,39.995197"
                    },
                    "radius": {
                        "type": "string",
                        "description": "Search radius in meters, default 2000"
                    }
                },
                "required": ["keywords", "location"],
                "additionalProperties": false
            }),
            handler: Box::new(|args, client| {
                let args = args.clone();
                let client = client.clone();
                Box::pin(async move { amap::around_search(&client, &args).await })
            }),
        });

        self.register(Tool {
            name: "maps_direction_driving".to_string(),
            description: "Plan a driving route between two coordinates.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "origin": {
                        "type": "string",
                        "description": "Start coordinate as lng,lat"
                    },
                    "destination": {
                        "type": "string",
                        "description": "End coordinate as lng,lat"
                    },
                    "strategy": {
                        "type": "string",
                        "description": "Routing strategy 0-19, default 0"
                    }
                },
                "required": ["origin", "destination"],
                "additionalProperties": false
            }),
            handler: Box::new(|args, client| {
                let args = args.clone();
                let client = client.clone();
                Box::pin(async move { amap::direction_driving(&client, &args).await })
            }),
        });

        self.register(Tool {
            name: "maps_direction_walking".to_string(),
            description: "Plan a walking route between two coordinates.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "origin": {
                        "type": "string",
                        "description": "Start coordinate as lng,lat"
                    },
                    "destination": {
                        "type": "string",
                        "description": "End coordinate as lng,lat"
                    }
                },
                "required": ["origin", "destination"],
                "additionalProperties": false
            }),
            handler: Box::new(|args, client| {
                let args = args.clone();
                let client = client.clone();
                Box::pin(async move { amap::direction_walking(&client, &args).await })
            }),
        });

        self.register(Tool {
            name: "maps_direction_transit".to_string(),
            description: "Plan a public-transit route between two coordinates, within a city \
                          or across cities."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "origin": {
                        "type": "string",
                        "description": "Start coordinate as lng,lat"
                    },
                    "destination": {
                        "type": "string",
                        "description": "End coordinate as lng,lat"
                    },
                    "city": {
                        "type": "string",
                        "description": "City name or adcode, e.g. Beijing or 110000"
                    },
                    "strategy": {
                        "type": "string",
                        "description": "0 fastest, 1 fewest transfers, 2 least walking, 3 no subway"
                    }
                },
                "required": ["origin", "destination", "city"],
                "additionalProperties": false
            }),
            handler: Box::new(|args, client| {
                let args = args.clone();
                let client = client.clone();
                Box::pin(async move { amap::direction_transit(&client, &args).await })
            }),
        });
    }

    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.get(name)
    }

    pub fn list(&self) -> Vec<&Tool> {
        self.tools.values().collect()
    }

    pub fn validate_arguments(&self, tool_name: &str, arguments: &Value) -> Result<(), String> {
        let tool = self
            .tools
            .get(tool_name)
            .ok_or_else(|| format!("Tool '{}' not found", tool_name))?;

        let schema = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&tool.input_schema)
            .map_err(|e| format!("Invalid tool schema: {}", e))?;

        if let Err(errors) = schema.validate(arguments) {
            let error_messages: Vec<String> = errors
                .map(|e| format!("{}: {}", e.instance_path, e))
                .collect();
            return Err(error_messages.join("; "));
        }

        Ok(())
    }
}

/// Tool definitions in the shape the chat-completions API expects.
pub fn format_tools_for_model(registry: &ToolRegistry) -> Vec<Value> {
    registry
        .list()
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "function": {
                    "name": tool.name,
                    "description": tool.description,
                    "parameters": tool.input_schema,
                }
            })
        })
        .collect()
}

pub async fn call_tool(
    registry: &ToolRegistry,
    tool_name: &str,
    arguments: &Value,
) -> Result<String, String> {
    registry.validate_arguments(tool_name, arguments)?;

    let tool = registry
        .get(tool_name)
        .ok_or_else(|| format!("Tool '{}' not found", tool_name))?;

    let handler = &tool.handler;
    handler(arguments, &registry.amap).await
}
