//! Structured error types for xlinteract.
//!
//! Only collaborator mutations and configuration loading can fail. Blocked
//! selections, degenerate geometry and out-of-range navigation are recovered
//! locally and never surface as errors.

/// All errors that can occur in the interaction engine and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum InteractError {
    /// A structural mutation (move, fill, drawing edit) was refused.
    #[error("Mutation rejected: {0}")]
    Rejected(String),

    /// A row, column or object index does not exist.
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Invalid engine configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, InteractError>;

impl From<String> for InteractError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for InteractError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<InteractError> for wasm_bindgen::JsValue {
    fn from(e: InteractError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
