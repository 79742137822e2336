//! Response bodies for the HTTP API.

use serde::{Deserialize, Serialize};

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Error classification returned in `errorCode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No character with the requested id
    CharacterNotFound,
    /// Body is missing required fields or holds out-of-range values
    InvalidCharacter,
    /// The storage backend failed; details are only in the server log
    BackendFailure,
}

/// Error body: `{"errorMessage": ..., "errorCode": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error_message: String,
    pub error_code: ErrorCode,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error_message: message.into(),
            error_code: code,
        }
    }

    pub fn character_not_found() -> Self {
        Self::new(ErrorCode::CharacterNotFound, "Character not found")
    }
}
