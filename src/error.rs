//! Error types shared across the crate.

use thiserror::Error;
use wasm_bindgen::JsValue;

use crate::service::AnalysisKind;

/// Failures reported by the remote text-analysis service.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Malformed service response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum FinmarkError {
    /// Submitted text is empty or whitespace only; displays the form's warning
    #[error("{}", .kind.empty_input_message())]
    EmptyInput { kind: AnalysisKind },

    /// Submitted text exceeds the form's character limit
    #[error("Input text has {len} characters, limit is {max}")]
    InputTooLong { len: usize, max: usize },

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The request never produced a response (network error, aborted fetch)
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FinmarkError>;

impl From<FinmarkError> for JsValue {
    fn from(err: FinmarkError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
