//! Client error taxonomy

use serde::Deserialize;
use shared::{ValidationError, ValidationErrors};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// Rejected input, locally or by the server
    #[error("{message}")]
    Validation {
        field: Option<String>,
        message: String,
    },

    /// The server refused a write that collides with existing data
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    /// Network failure or an unexpected server answer
    #[error("{0}")]
    Transport(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorBodyDetail,
}

#[derive(Deserialize)]
struct ErrorBodyDetail {
    message: String,
    #[serde(default)]
    field: Option<String>,
}

impl ClientError {
    /// Map a non-success response onto the taxonomy, keeping the server's message
    pub fn from_response(status: u16, body: &str) -> Self {
        let (message, field) = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => (parsed.error.message, parsed.error.field),
            Err(_) if body.trim().is_empty() => (format!("Request failed with status {}", status), None),
            Err(_) => (body.trim().to_string(), None),
        };

        match status {
            400 | 422 => ClientError::Validation { field, message },
            401 | 403 => ClientError::Unauthorized(message),
            404 => ClientError::NotFound(message),
            409 => ClientError::Conflict(message),
            _ => ClientError::Transport(message),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation { .. })
    }
}

impl From<ValidationError> for ClientError {
    fn from(error: ValidationError) -> Self {
        ClientError::Validation {
            message: error.to_string(),
            field: Some(error.field),
        }
    }
}

impl From<ValidationErrors> for ClientError {
    fn from(errors: ValidationErrors) -> Self {
        ClientError::Validation {
            field: errors.first().map(|e| e.field.clone()),
            message: errors.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        ClientError::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_detail_kept_verbatim() {
        let body = r#"{"error":{"code":"CONFLICT","message":"SKU 'A1' already exists in warehouse 'W1'","field":"sku"}}"#;
        assert_eq!(
            ClientError::from_response(409, body),
            ClientError::Conflict("SKU 'A1' already exists in warehouse 'W1'".into())
        );
    }

    #[test]
    fn test_status_mapping() {
        let body = r#"{"error":{"code":"VALIDATION_ERROR","message":"quantity must not be negative","field":"quantity"}}"#;
        assert_eq!(
            ClientError::from_response(400, body),
            ClientError::Validation {
                field: Some("quantity".into()),
                message: "quantity must not be negative".into()
            }
        );
        assert!(matches!(ClientError::from_response(401, ""), ClientError::Unauthorized(_)));
        assert!(matches!(ClientError::from_response(404, "missing"), ClientError::NotFound(m) if m == "missing"));
        assert!(matches!(ClientError::from_response(502, "<html>"), ClientError::Transport(_)));
    }

    #[test]
    fn test_local_validation_errors() {
        let errors = ValidationErrors(vec![ValidationError::new("mrp", "must not be negative")]);
        let err = ClientError::from(errors);
        assert!(err.is_validation());
        assert!(matches!(err, ClientError::Validation { field: Some(f), .. } if f == "mrp"));
    }
}
