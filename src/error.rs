use std::fmt;

#[derive(Debug)]
pub enum WayfarerError {
    ApiError {
        status: u16,
        message: String,
    },
    ConfigError(String),
    ToolError(String),
    HistoryError(String),
    NetworkError(reqwest::Error),
    Timeout,
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    YamlError(serde_yaml::Error),
    Other(String),
}

impl fmt::Display for WayfarerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WayfarerError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            WayfarerError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            WayfarerError::ToolError(msg) => write!(f, "Tool error: {}", msg),
            WayfarerError::HistoryError(msg) => write!(f, "Chat history error: {}", msg),
            WayfarerError::NetworkError(e) => write!(f, "Network error: {}", e),
            WayfarerError::Timeout => write!(f, "Request timeout"),
            WayfarerError::IoError(e) => write!(f, "IO error: {}", e),
            WayfarerError::JsonError(e) => write!(f, "JSON error: {}", e),
            WayfarerError::YamlError(e) => write!(f, "YAML error: {}", e),
            WayfarerError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for WayfarerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WayfarerError::NetworkError(e) => Some(e),
            WayfarerError::IoError(e) => Some(e),
            WayfarerError::JsonError(e) => Some(e),
            WayfarerError::YamlError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WayfarerError {
    fn from(err: reqwest::Error) -> Self {
        WayfarerError::NetworkError(err)
    }
}

impl From<std::io::Error> for WayfarerError {
    fn from(err: std::io::Error) -> Self {
        WayfarerError::IoError(err)
    }
}

impl From<serde_json::Error> for WayfarerError {
    fn from(err: serde_json::Error) -> Self {
        WayfarerError::JsonError(err)
    }
}

impl From<serde_yaml::Error> for WayfarerError {
    fn from(err: serde_yaml::Error) -> Self {
        WayfarerError::YamlError(err)
    }
}

impl From<anyhow::Error> for WayfarerError {
    fn from(err: anyhow::Error) -> Self {
        WayfarerError::Other(err.to_string())
    }
}

impl From<String> for WayfarerError {
    fn from(msg: String) -> Self {
        WayfarerError::Other(msg)
    }
}

impl From<&str> for WayfarerError {
    fn from(msg: &str) -> Self {
        WayfarerError::Other(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WayfarerError>;
