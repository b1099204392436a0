use thiserror::Error;

/// Result type alias for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors a tool call can end in. All of them are reported back to the
/// caller as a structured `isError` result, never as a protocol error.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Input series is empty where at least one value is required.
    #[error("No data provided")]
    EmptyInput,

    /// A parameter is outside its valid domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Tool arguments do not match the expected shape.
    #[error("invalid arguments: {0}")]
    InvalidArguments(#[source] serde_json::Error),

    /// A `chart_config` argument is not a JSON object.
    #[error("malformed chart config: {0}")]
    MalformedConfig(#[source] serde_json::Error),

    #[error("unknown tool: {0}")]
    UnknownTool(String),

    #[error("failed to encode result: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_descriptive() {
        assert_eq!(ToolError::EmptyInput.to_string(), "No data provided");

        let err = ToolError::InvalidParameter("window_size must be positive".to_string());
        assert_eq!(err.to_string(), "invalid parameter: window_size must be positive");

        let err = ToolError::UnknownTool("create_sankey_chart".to_string());
        assert_eq!(err.to_string(), "unknown tool: create_sankey_chart");
    }

    #[test]
    fn malformed_config_carries_parser_message() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = ToolError::MalformedConfig(parse_err);
        assert!(err.to_string().starts_with("malformed chart config:"));
    }
}
