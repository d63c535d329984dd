use serde_json::json;

use wayfarer::config::AmapConfig;
use wayfarer::tools::{call_tool, format_tools_for_model, AmapClient, ToolRegistry};

fn registry_without_key() -> ToolRegistry {
    ToolRegistry::new(AmapClient::new(&AmapConfig {
        key: String::new(),
        endpoint: "https://restapi.amap.com".to_string(),
    }))
}

#[test]
fn registry_exposes_all_map_tools() {
    let registry = registry_without_key();

    let mut names: Vec<String> = registry
        .list()
        .iter()
        .map(|tool| tool.name.clone())
        .collect();
    names.sort();

    assert_eq!(
        names,
        vec![
            "maps_around_search",
            "maps_direction_driving",
            "maps_direction_transit",
            "maps_direction_walking",
            "maps_geocode",
            "maps_weather",
        ]
    );
}

#[test]
fn tools_are_formatted_as_function_definitions() {
    let registry = registry_without_key();

    let formatted = format_tools_for_model(&registry);
    assert_eq!(formatted.len(), 6);
    for tool in &formatted {
        assert_eq!(tool["type"], "function");
        assert!(tool["function"]["name"].is_string());
        assert_eq!(tool["function"]["parameters"]["type"], "object");
    }
}

#[test]
fn validates_required_arguments() {
    let registry = registry_without_key();

    assert!(registry
        .validate_arguments("maps_weather", &json!({"city": "Beijing"}))
        .is_ok());
    assert!(registry
        .validate_arguments("maps_weather", &json!({}))
        .is_err());
    assert!(registry
        .validate_arguments("maps_weather", &json!({"city": "Beijing", "extra": 1}))
        .is_err());
}

#[test]
fn unknown_tool_is_rejected() {
    let registry = registry_without_key();
    assert!(registry
        .validate_arguments("maps_nonexistent", &json!({}))
        .is_err());
}

#[tokio::test]
async fn missing_api_key_yields_a_configuration_hint() {
    let registry = registry_without_key();

    let result = call_tool(&registry, "maps_weather", &json!({"city": "Beijing"}))
        .await
        .unwrap();
    assert!(result.contains("AMap API key not configured"));
}

#[tokio::test]
async fn invalid_arguments_fail_before_the_handler_runs() {
    let registry = registry_without_key();

    let result = call_tool(&registry, "maps_weather", &json!({"town": "Beijing"})).await;
    assert!(result.is_err());
}
