use thiserror::Error;

/// Everything that can go wrong in the solar-system core.
///
/// Pointer and wheel input never produce errors; they are clamped instead.
#[derive(Debug, Error)]
pub enum OrreryError {
    /// Lookup of a body key that is not in the registry.
    #[error("unknown body `{0}`")]
    UnknownBody(String),
    /// A configuration value outside its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Configuration text that is not valid JSON or has the wrong shape.
    #[error("malformed configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, OrreryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_errors_convert_and_describe_themselves() {
        let err: OrreryError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, OrreryError::Json(_)));
        assert!(err.to_string().starts_with("malformed configuration JSON"));
    }
}
