use thiserror::Error;

/// Error taxonomy for one-shot corpus analysis. Input and output failures
/// abort the run; malformed markup inside a string value is never an error
/// (the inspector degrades to empty results instead).
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("failed to read input {path}: {source}")]
    InputIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("input is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("top-level JSON must be an object or an array of objects, found {found}")]
    UnsupportedRoot { found: &'static str },

    #[error("failed to write {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    ReportSerialization(#[source] serde_json::Error),
}

/// Human-readable name of a JSON value's type, for error messages.
pub fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
