use serde::{Deserialize, Serialize};

/// Resolved AMap web-service settings. An empty key is legal: the map tools
/// then answer with a configuration hint instead of calling out.
#[derive(Debug, Clone)]
pub struct AmapConfig {
    pub key: String,
    pub endpoint: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AmapFileConfig {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
}
