//! API error types.

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use thiserror::Error;

/// Errors returned by [`ChallongeClient`](super::ChallongeClient) calls
#[derive(Debug, Error)]
pub enum ApiError {
    /// The underlying HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    /// The request never produced a response (connect error, timeout, reset)
    #[error("Request {method} {endpoint} failed: {error}")]
    Transport {
        method: Method,
        endpoint: String,
        error: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{method} {endpoint} returned {status}: {body}")]
    Status {
        method: Method,
        endpoint: String,
        status: StatusCode,
        body: String,
    },

    /// The server refused a participant because the name is already taken
    #[error("Duplicate participant rejected ({}), payload: {payload}", .errors.join("; "))]
    DuplicateParticipant {
        errors: Vec<String>,
        payload: serde_json::Value,
    },

    /// The response body was not the expected JSON shape
    #[error("Failed to decode response from {endpoint}: {error}")]
    Decode {
        endpoint: String,
        error: serde_json::Error,
    },
}

/// Error body the service returns for validation failures
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
}

impl ApiError {
    /// Classify a non-success response.
    ///
    /// On a participant endpoint, a 422 carrying a "has already been taken"
    /// message is a duplicate participant; `payload` is what was sent,
    /// without credentials. Elsewhere the same message (a taken URL slug,
    /// for instance) stays a plain status error.
    pub(crate) fn from_response(
        method: Method,
        endpoint: &str,
        status: StatusCode,
        body: String,
        payload: Option<&serde_json::Value>,
    ) -> Self {
        if status == StatusCode::UNPROCESSABLE_ENTITY && is_participant_endpoint(endpoint) {
            let errors = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.errors)
                .unwrap_or_default();
            if errors.iter().any(|e| e.contains("already been taken")) {
                return ApiError::DuplicateParticipant {
                    errors,
                    payload: payload.cloned().unwrap_or(serde_json::Value::Null),
                };
            }
        }

        ApiError::Status {
            method,
            endpoint: endpoint.to_string(),
            status,
            body,
        }
    }

    /// HTTP status of the failure, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::DuplicateParticipant { .. } => Some(StatusCode::UNPROCESSABLE_ENTITY),
            _ => None,
        }
    }
}

/// `tournaments/{id}/participants...`
fn is_participant_endpoint(endpoint: &str) -> bool {
    endpoint.split('/').nth(2) == Some("participants")
}

/// Errors that may go away on their own if the call is repeated
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for ApiError {
    fn is_transient(&self) -> bool {
        match self {
            // Builder errors are malformed requests, not network trouble
            ApiError::Transport { error, .. } => !error.is_builder(),
            ApiError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn status_error(status: StatusCode) -> ApiError {
        ApiError::from_response(
            Method::GET,
            "tournaments",
            status,
            String::new(),
            None,
        )
    }

    #[test]
    fn test_server_errors_are_transient() {
        assert!(status_error(StatusCode::INTERNAL_SERVER_ERROR).is_transient());
        assert!(status_error(StatusCode::BAD_GATEWAY).is_transient());
        assert!(status_error(StatusCode::TOO_MANY_REQUESTS).is_transient());
    }

    #[test]
    fn test_client_errors_are_not_transient() {
        assert!(!status_error(StatusCode::NOT_FOUND).is_transient());
        assert!(!status_error(StatusCode::UNAUTHORIZED).is_transient());
    }

    #[test]
    fn test_duplicate_participant_detection() {
        let payload = json!({ "participants": [{ "name": "alice" }] });
        let err = ApiError::from_response(
            Method::POST,
            "tournaments/1/participants/bulk_add",
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"errors":["Name has already been taken"]}"#.to_string(),
            Some(&payload),
        );

        match &err {
            ApiError::DuplicateParticipant { errors, payload: sent } => {
                assert_eq!(errors, &vec!["Name has already been taken".to_string()]);
                assert_eq!(sent, &payload);
            }
            other => panic!("Expected duplicate participant, got {other:?}"),
        }
        assert!(!err.is_transient());
        assert!(err.to_string().contains("alice"));
    }

    #[test]
    fn test_taken_url_on_tournament_endpoint_stays_status() {
        let payload = json!({ "tournament": { "name": "Cup", "url": "cup" } });
        let err = ApiError::from_response(
            Method::POST,
            "tournaments",
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"errors":["URL has already been taken"]}"#.to_string(),
            Some(&payload),
        );
        assert!(matches!(err, ApiError::Status { .. }));
        assert!(err.to_string().contains("URL has already been taken"));
        assert!(!err.to_string().contains("Duplicate participant"));
    }

    #[test]
    fn test_participant_endpoint_detection() {
        assert!(is_participant_endpoint("tournaments/1/participants/bulk_add"));
        assert!(is_participant_endpoint("tournaments/cup_1/participants"));
        assert!(!is_participant_endpoint("tournaments"));
        assert!(!is_participant_endpoint("tournaments/1"));
    }

    #[test]
    fn test_decode_error_message_carries_cause_once() {
        let cause = serde_json::from_str::<Value>("not json").unwrap_err();
        let cause_text = cause.to_string();
        let err = ApiError::Decode {
            endpoint: "tournaments".to_string(),
            error: cause,
        };

        assert!(err.to_string().contains(&cause_text));
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn test_other_validation_errors_stay_status() {
        let err = ApiError::from_response(
            Method::POST,
            "tournaments",
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"errors":["Name can't be blank"]}"#.to_string(),
            None,
        );
        assert!(matches!(err, ApiError::Status { .. }));
        assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));
    }
}
