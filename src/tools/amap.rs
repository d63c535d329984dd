use serde_json::Value;

use crate::config::AmapConfig;

const MISSING_KEY_HINT: &str = "AMap API key not configured. Set the AMAP_API_KEY environment \
variable or amap.key in the config file.";

/// Thin client for the AMap web-service REST API. Every lookup returns a
/// short formatted text block suitable for feeding back to the model as a
/// tool result; lookup failures are reported in the text, not as errors.
#[derive(Clone)]
pub struct AmapClient {
    http: reqwest::Client,
    endpoint: String,
    key: String,
}

impl AmapClient {
    pub fn new(config: &AmapConfig) -> Self {
        AmapClient {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            key: config.key.clone(),
        }
    }

    pub fn has_key(&self) -> bool {
        !self.key.is_empty()
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, String> {
        let url = format!("{}{}", self.endpoint, path);
        let mut query: Vec<(&str, &str)> = query.to_vec();
        query.push(("key", self.key.as_str()));

        let response = self
            .http
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| format!("AMap request failed: {}", e))?;
        response
            .json::<Value>()
            .await
            .map_err(|e| format!("AMap response was not valid JSON: {}", e))
    }
}

/// Forecast weather for a city, falling back to live conditions when the
/// forecast list is empty.
pub async fn weather(client: &AmapClient, args: &Value) -> Result<String, String> {
    let city = require_str(args, "city")?;
    if !client.has_key() {
        return Ok(MISSING_KEY_HINT.to_string());
    }

    let root = client
        .get_json(
            "/v3/weather/weatherInfo",
            &[("city", city), ("extensions", "all")],
        )
        .await?;
    if !status_ok(&root) {
        return Ok(format!("Weather lookup failed: {}", info(&root)));
    }
    if let Some(report) = format_forecast(&root) {
        return Ok(report);
    }

    // Empty forecast, ask for live conditions instead
    let root = client
        .get_json(
            "/v3/weather/weatherInfo",
            &[("city", city), ("extensions", "base")],
        )
        .await?;
    if status_ok(&root) {
        if let Some(report) = format_live(&root) {
            return Ok(report);
        }
    }
    Ok("No weather data available".to_string())
}

/// Address to coordinates.
pub async fn geocode(client: &AmapClient, args: &Value) -> Result<String, String> {
    let address = require_str(args, "address")?;
    if !client.has_key() {
        return Ok(MISSING_KEY_HINT.to_string());
    }

    let mut query = vec![("address", address)];
    if let Some(city) = optional_str(args, "city") {
        query.push(("city", city));
    }

    let root = client.get_json("/v3/geocode/geo", &query).await?;
    if !status_ok(&root) {
        return Ok(format!("Geocoding failed: {}", info(&root)));
    }
    Ok(format_geocode(&root, address)
        .unwrap_or_else(|| "No coordinates found for that address".to_string()))
}

/// Points of interest around a coordinate.
pub async fn around_search(client: &AmapClient, args: &Value) -> Result<String, String> {
    let keywords = require_str(args, "keywords")?;
    let location = require_str(args, "location")?;
    if !client.has_key() {
        return Ok(MISSING_KEY_HINT.to_string());
    }
    let radius = optional_str(args, "radius").unwrap_or("2000");

    let root = client
        .get_json(
            "/v3/place/around",
            &[
                ("keywords", keywords),
                ("location", location),
                ("radius", radius),
            ],
        )
        .await?;
    if !status_ok(&root) {
        return Ok(format!("Nearby search failed: {}", info(&root)));
    }
    Ok(format_pois(&root, keywords, radius)
        .unwrap_or_else(|| "No matching places found".to_string()))
}

/// Driving route between two coordinates.
pub async fn direction_driving(client: &AmapClient, args: &Value) -> Result<String, String> {
    let origin = require_str(args, "origin")?;
    let destination = require_str(args, "destination")?;
    if !client.has_key() {
        return Ok(MISSING_KEY_HINT.to_string());
    }
    let strategy = optional_str(args, "strategy").unwrap_or("0");

    let root = client
        .get_json(
            "/v3/direction/driving",
            &[
                ("origin", origin),
                ("destination", destination),
                ("strategy", strategy),
                ("extensions", "base"),
            ],
        )
        .await?;
    if !status_ok(&root) {
        return Ok(format!("Driving route planning failed: {}", info(&root)));
    }
    Ok(format_drive_route(&root)
        .unwrap_or_else(|| "No suitable driving route found".to_string()))
}

/// Walking route between two coordinates.
pub async fn direction_walking(client: &AmapClient, args: &Value) -> Result<String, String> {
    let origin = require_str(args, "origin")?;
    let destination = require_str(args, "destination")?;
    if !client.has_key() {
        return Ok(MISSING_KEY_HINT.to_string());
    }

    let root = client
        .get_json(
            "/v3/direction/walking",
            &[("origin", origin), ("destination", destination)],
        )
        .await?;
    if !status_ok(&root) {
        return Ok(format!("Walking route planning failed: {}", info(&root)));
    }
    Ok(format_walk_route(&root)
        .unwrap_or_else(|| "No suitable walking route found".to_string()))
}

/// Public-transit route between two coordinates within a city.
pub async fn direction_transit(client: &AmapClient, args: &Value) -> Result<String, String> {
    let origin = require_str(args, "origin")?;
    let destination = require_str(args, "destination")?;
    let city = require_str(args, "city")?;
    if !client.has_key() {
        return Ok(MISSING_KEY_HINT.to_string());
    }
    let strategy = optional_str(args, "strategy").unwrap_or("0");

    let root = client
        .get_json(
            "/v3/direction/transit/integrated",
            &[
                ("origin", origin),
                ("destination", destination),
                ("city", city),
                ("strategy", strategy),
            ],
        )
        .await?;
    if !status_ok(&root) {
        return Ok(format!("Transit route planning failed: {}", info(&root)));
    }
    Ok(format_transit_route(&root)
        .unwrap_or_else(|| "No suitable transit route found".to_string()))
}

// Response formatting. Each function takes the parsed API response and
// yields None when the payload carries no usable result.

fn format_forecast(root: &Value) -> Option<String> {
    let forecast = root.get("forecasts")?.as_array()?.first()?;
    let casts = forecast.get("casts")?.as_array()?;
    if casts.is_empty() {
        return None;
    }

    let mut report = format!("Forecast for {}:\n", text(forecast, "city"));
    for cast in casts.iter().take(4) {
        report.push_str(&format!(
            "{}: {} {}C by day, {} {}C at night\n",
            text(cast, "date"),
            text(cast, "dayweather"),
            text(cast, "daytemp"),
            text(cast, "nightweather"),
            text(cast, "nighttemp"),
        ));
    }
    Some(report)
}

fn format_live(root: &Value) -> Option<String> {
    let live = root.get("lives")?.as_array()?.first()?;
    Some(format!(
        "{} now: {} {}C, {} wind, humidity {}%",
        text(live, "city"),
        text(live, "weather"),
        text(live, "temperature"),
        text(live, "winddirection"),
        text(live, "humidity"),
    ))
}

fn format_geocode(root: &Value, address: &str) -> Option<String> {
    let geocode = root.get("geocodes")?.as_array()?.first()?;
    Some(format!(
        "{} -> {} (level: {})",
        address,
        text(geocode, "location"),
        text(geocode, "level"),
    ))
}

fn format_pois(root: &Value, keywords: &str, radius: &str) -> Option<String> {
    let pois = root.get("pois")?.as_array()?;
    if pois.is_empty() {
        return None;
    }

    let mut report = format!("Nearby {} within {} m:\n", keywords, radius);
    for (i, poi) in pois.iter().take(5).enumerate() {
        report.push_str(&format!(
            "{}. {} - {} - {}\n",
            i + 1,
            text(poi, "name"),
            text(poi, "address"),
            text(poi, "location"),
        ));
    }
    Some(report)
}

fn format_drive_route(root: &Value) -> Option<String> {
    let path = root.get("route")?.get("paths")?.as_array()?.first()?;
    let km = text(path, "distance").parse::<u64>().unwrap_or(0) as f64 / 1000.0;
    let minutes = duration_minutes(text(path, "duration"));

    let mut report = format!("Driving: about {:.1} km, about {} min.\n", km, minutes);
    if let Some(steps) = path.get("steps").and_then(Value::as_array) {
        for (i, step) in steps.iter().take(5).enumerate() {
            report.push_str(&format!(
                "{}. {} {}\n",
                i + 1,
                text(step, "road"),
                text(step, "instruction"),
            ));
        }
        if steps.len() > 5 {
            report.push_str("...");
        }
    }
    Some(report)
}

fn format_walk_route(root: &Value) -> Option<String> {
    let path = root.get("route")?.get("paths")?.as_array()?.first()?;
    let km = text(path, "distance").parse::<u64>().unwrap_or(0) as f64 / 1000.0;
    let minutes = duration_minutes(text(path, "duration"));

    let mut report = format!("Walking: about {:.1} km, about {} min.\n", km, minutes);
    if let Some(steps) = path.get("steps").and_then(Value::as_array) {
        for (i, step) in steps.iter().take(6).enumerate() {
            report.push_str(&format!("{}. {}\n", i + 1, text(step, "instruction")));
        }
        if steps.len() > 6 {
            report.push_str("...");
        }
    }
    Some(report)
}

fn format_transit_route(root: &Value) -> Option<String> {
    let transit = root.get("route")?.get("transits")?.as_array()?.first()?;
    let minutes = duration_minutes(text(transit, "duration"));
    let cost = text(transit, "cost");

    let mut report = format!(
        "Transit: about {} min, fare about {} yuan.\n",
        minutes,
        if cost.is_empty() { "-" } else { cost },
    );
    if let Some(segments) = transit.get("segments").and_then(Value::as_array) {
        for (i, segment) in segments.iter().take(6).enumerate() {
            let buslines = segment
                .get("bus")
                .and_then(|b| b.get("buslines"))
                .and_then(Value::as_array);
            if let Some(line) = buslines.and_then(|b| b.first()) {
                report.push_str(&format!("{}. take {}\n", i + 1, text(line, "name")));
            } else {
                let walk = segment
                    .get("walking")
                    .map(|w| text(w, "distance"))
                    .unwrap_or("");
                if !walk.is_empty() {
                    report.push_str(&format!("{}. walk {} m\n", i + 1, walk));
                }
            }
        }
        if segments.len() > 6 {
            report.push_str("...");
        }
    }
    Some(report)
}

fn status_ok(root: &Value) -> bool {
    root.get("status").and_then(Value::as_str) == Some("1")
}

fn info(root: &Value) -> &str {
    root.get("info").and_then(Value::as_str).unwrap_or("unknown")
}

fn text<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

fn duration_minutes(seconds: &str) -> u64 {
    let seconds = seconds.parse::<f64>().unwrap_or(0.0);
    (seconds / 60.0).round() as u64
}

fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, String> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| format!("Missing required argument: {}", key))
}

fn optional_str<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn forecast_formats_up_to_four_days() {
        let root = json!({
            "status": "1",
            "forecasts": [{
                "city": "Beijing",
                "casts": [
                    {"date": "2026-08-05", "dayweather": "Sunny", "daytemp": "31",
                     "nightweather": "Clear", "nighttemp": "24"},
                    {"date": "2026-08-06", "dayweather": "Cloudy", "daytemp": "29",
                     "nightweather": "Overcast", "nighttemp": "23"},
                    {"date": "2026-08-07", "dayweather": "Rain", "daytemp": "26",
                     "nightweather": "Rain", "nighttemp": "22"},
                    {"date": "2026-08-08", "dayweather": "Sunny", "daytemp": "30",
                     "nightweather": "Clear", "nighttemp": "24"},
                    {"date": "2026-08-09", "dayweather": "Sunny", "daytemp": "32",
                     "nightweather": "Clear", "nighttemp": "25"}
                ]
            }]
        });

        let report = format_forecast(&root).unwrap();
        assert!(report.starts_with("Forecast for Beijing:"));
        assert!(report.contains("2026-08-05: Sunny 31C by day, Clear 24C at night"));
        assert!(report.contains("2026-08-08"));
        assert!(!report.contains("2026-08-09"));
    }

    #[test]
    fn empty_forecast_yields_none() {
        let root = json!({"status": "1", "forecasts": [{"city": "Beijing", "casts": []}]});
        assert!(format_forecast(&root).is_none());
    }

    #[test]
    fn live_weather_formats_single_line() {
        let root = json!({
            "status": "1",
            "lives": [{
                "city": "Shanghai", "weather": "Cloudy", "temperature": "28",
                "winddirection": "SE", "humidity": "70"
            }]
        });
        assert_eq!(
            format_live(&root).unwrap(),
            "Shanghai now: Cloudy 28C, SE wind, humidity 70%"
        );
    }

    #[test]
    fn pois_list_caps_at_five() {
        let pois: Vec<Value> = (1..=7)
            .map(|i| {
                json!({"name": format!("Cinema {}", i), "address": "Somewhere",
                       "location": "116.4,39.9"})
            })
            .collect();
        let root = json!({"status": "1", "pois": pois});

        let report = format_pois(&root, "cinema", "2000").unwrap();
        assert!(report.starts_with("Nearby cinema within 2000 m:"));
        assert!(report.contains("5. Cinema 5"));
        assert!(!report.contains("6. Cinema 6"));
    }

    #[test]
    fn drive_route_summarizes_distance_and_steps() {
        let root = json!({
            "status": "1",
            "route": {"paths": [{
                "distance": "12500", "duration": "1800",
                "steps": [
                    {"road": "Ring Rd", "instruction": "Head north"},
                    {"road": "Main St", "instruction": "Turn left"}
                ]
            }]}
        });

        let report = format_drive_route(&root).unwrap();
        assert!(report.starts_with("Driving: about 12.5 km, about 30 min."));
        assert!(report.contains("1. Ring Rd Head north"));
        assert!(report.contains("2. Main St Turn left"));
    }

    #[test]
    fn transit_route_mixes_bus_and_walk_segments() {
        let root = json!({
            "status": "1",
            "route": {"transits": [{
                "duration": "2400", "cost": "4",
                "segments": [
                    {"walking": {"distance": "300"}, "bus": {"buslines": []}},
                    {"bus": {"buslines": [{"name": "Line 10 (Metro)"}]}}
                ]
            }]}
        });

        let report = format_transit_route(&root).unwrap();
        assert!(report.starts_with("Transit: about 40 min, fare about 4 yuan."));
        assert!(report.contains("1. walk 300 m"));
        assert!(report.contains("2. take Line 10 (Metro)"));
    }

    #[test]
    fn failed_status_is_reported_in_text() {
        let root = json!({"status": "0", "info": "INVALID_USER_KEY"});
        assert!(!status_ok(&root));
        assert_eq!(info(&root), "INVALID_USER_KEY");
    }
}
