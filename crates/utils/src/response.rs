//! The response envelope every admin API endpoint wraps its payload in.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// One entry of an envelope's `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl ErrorDetail {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeViolation {
    #[error("success envelope carries {0} error entries")]
    SuccessWithErrors(usize),
    #[error("failure envelope carries a data payload")]
    FailureWithData,
    #[error("failure envelope has no error entries")]
    FailureWithoutErrors,
}

/// `{ success, code, data, errors, meta }`
///
/// Decoded once per HTTP response and consumed immediately by the client; the
/// payload type defaults to raw JSON so callers can decode `data` lazily.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T = serde_json::Value> {
    pub success: bool,
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
    #[serde(default)]
    pub meta: serde_json::Value,
}

impl<T> ApiEnvelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: 200,
            data: Some(data),
            errors: Vec::new(),
            meta: serde_json::Value::Null,
        }
    }

    pub fn failure(code: i32, errors: Vec<ErrorDetail>) -> Self {
        Self {
            success: false,
            code,
            data: None,
            errors,
            meta: serde_json::Value::Null,
        }
    }

    /// First error entry, which is what gets surfaced to users.
    pub fn first_error(&self) -> Option<&ErrorDetail> {
        self.errors.first()
    }

    /// Checks the success/data/errors invariant.
    pub fn validate(&self) -> Result<(), EnvelopeViolation> {
        match (self.success, self.data.is_some(), self.errors.len()) {
            (true, _, 0) => Ok(()),
            (true, _, n) => Err(EnvelopeViolation::SuccessWithErrors(n)),
            (false, true, _) => Err(EnvelopeViolation::FailureWithData),
            (false, false, 0) => Err(EnvelopeViolation::FailureWithoutErrors),
            (false, false, _) => Ok(()),
        }
    }
}
