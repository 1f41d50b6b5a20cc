//! Uniform success/error envelope returned by every boundary call.

use super::ErrorExposure;
use crate::error::{CoreError, ErrorCode};
use crate::model::validation::FieldError;
use serde::Serialize;

const VALIDATION_MESSAGE: &str = "Validation error";
const REDACTED_INTERNAL_MESSAGE: &str = "Internal server error";

/// Response envelope for one boundary call.
///
/// `status` is the HTTP-style code a transport layer should answer with; it
/// is not part of the serialized body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    #[serde(skip)]
    pub status: u16,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: 200,
            success: true,
            data: Some(data),
            count: None,
            error: None,
            message: None,
            details: None,
        }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status: 201,
            ..Self::ok(data).with_message(message)
        }
    }

    /// Success without a payload, e.g. a delete acknowledgement.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            status: 200,
            success: true,
            data: None,
            count: None,
            error: None,
            message: Some(message.into()),
            details: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Builds the failure envelope for `err`.
    ///
    /// Internal error details are replaced by a generic message unless
    /// `exposure` is `Development`.
    pub fn failure(err: &CoreError, exposure: ErrorExposure) -> Self {
        let code = err.code();
        let message = match err {
            CoreError::ValidationFailed(_) => VALIDATION_MESSAGE.to_string(),
            CoreError::Internal(_) if exposure == ErrorExposure::Production => {
                REDACTED_INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        };

        Self {
            status: code.http_status(),
            success: false,
            data: None,
            count: None,
            error: Some(code),
            message: Some(message),
            details: err.field_errors().map(<[FieldError]>::to_vec),
        }
    }
}

impl<I> ApiResponse<Vec<I>> {
    /// Success envelope for a list, carrying its length as `count`.
    pub fn list(items: Vec<I>) -> Self {
        let count = items.len();
        Self {
            count: Some(count),
            ..Self::ok(items)
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
