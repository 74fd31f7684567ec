use thiserror::Error;

/// Result type for documentation operations
pub type ApiDocResult<T> = Result<T, ApiDocError>;

/// Errors that can occur while assembling, exporting or serving documentation
#[derive(Debug, Error)]
pub enum ApiDocError {
    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Route registration or conversion error
    #[error("Route error: {0}")]
    Route(String),

    /// Export error
    #[error("Export error: {0}")]
    Export(String),

    /// Generic error with context
    #[error("API documentation error: {0}")]
    Generic(String),
}

impl ApiDocError {
    /// Create a new configuration error
    pub fn config_error<T: ToString>(msg: T) -> Self {
        Self::Config(msg.to_string())
    }

    /// Create a new route error
    pub fn route_error<T: ToString>(msg: T) -> Self {
        Self::Route(msg.to_string())
    }

    /// Create a new export error
    pub fn export_error<T: ToString>(msg: T) -> Self {
        Self::Export(msg.to_string())
    }

    /// Create a generic error
    pub fn generic<T: ToString>(msg: T) -> Self {
        Self::Generic(msg.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ApiDocError::route_error("Unsupported HTTP method: BREW").to_string(),
            "Route error: Unsupported HTTP method: BREW"
        );
        assert_eq!(
            ApiDocError::config_error("empty base path").to_string(),
            "Configuration error: empty base path"
        );
    }

    #[test]
    fn test_from_conversions() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(matches!(ApiDocError::from(io), ApiDocError::Io(_)));

        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(ApiDocError::from(json), ApiDocError::Json(_)));

        let toml = toml::from_str::<toml::Value>("= broken").unwrap_err();
        assert!(matches!(ApiDocError::from(toml), ApiDocError::Toml(_)));
    }
}
