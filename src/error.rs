//! Error types for SCIM endpoint operations.
//!
//! Errors are structured values rather than re-wrapped messages: every variant knows
//! its HTTP status and SCIM `scimType`, and wrapped delegate failures keep their
//! underlying cause so the chain survives propagation through the adapter.

use crate::protocol::constants::{ERROR_SCHEMA, SCIM_MEDIA_TYPE};
use crate::protocol::ScimResponse;
use serde_json::{Value, json};

/// Main error type for SCIM endpoint operations.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
    /// Request body is absent or cannot be decoded into the expected representation
    #[error("Format not supported: {detail}")]
    FormatNotSupported { detail: String },

    /// Request body was sent with a media type the endpoint does not consume
    #[error("Unsupported media type: {media_type}")]
    UnsupportedMediaType { media_type: String },

    /// Invalid request shape or parameters
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Filter expression rejected by the resource manager
    #[error("Invalid filter: {detail}")]
    InvalidFilter { detail: String },

    /// Resource not found
    #[error("Resource not found: {resource_type} with ID {id}")]
    ResourceNotFound { resource_type: String, id: String },

    /// Uniqueness constraint violated
    #[error("Uniqueness violation: {detail}")]
    Uniqueness { detail: String },

    /// Protocol error raised by a delegate resource manager, carrying its own status
    #[error("{detail}")]
    Protocol {
        status: u16,
        scim_type: Option<String>,
        detail: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

/// Coarse classification of [`ScimError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The inbound body or parameters could not be decoded
    Format,
    /// The request violated a protocol precondition
    Protocol,
    /// Failure on the server side
    Internal,
}

/// Errors that can occur while configuring or starting the server.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Listener could not be bound or served
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScimError {
    /// Create a format error
    pub fn format_not_supported(detail: impl Into<String>) -> Self {
        Self::FormatNotSupported {
            detail: detail.into(),
        }
    }

    /// Create a resource not found error
    pub fn resource_not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an invalid filter error
    pub fn invalid_filter(detail: impl Into<String>) -> Self {
        Self::InvalidFilter {
            detail: detail.into(),
        }
    }

    /// Create a uniqueness error
    pub fn uniqueness(detail: impl Into<String>) -> Self {
        Self::Uniqueness {
            detail: detail.into(),
        }
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a protocol error with an explicit status.
    pub fn protocol(status: u16, detail: impl Into<String>) -> Self {
        Self::Protocol {
            status,
            scim_type: None,
            detail: detail.into(),
            source: None,
        }
    }

    /// Wrap a delegate failure, keeping it as the error source.
    pub fn protocol_with_source<E>(status: u16, detail: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Protocol {
            status,
            scim_type: None,
            detail: detail.into(),
            source: Some(Box::new(source)),
        }
    }

    /// HTTP status code signalled by this error.
    pub fn status(&self) -> u16 {
        match self {
            Self::FormatNotSupported { .. } | Self::Json(_) => 400,
            Self::UnsupportedMediaType { .. } => 415,
            Self::InvalidRequest { .. } | Self::InvalidFilter { .. } => 400,
            Self::ResourceNotFound { .. } => 404,
            Self::Uniqueness { .. } => 409,
            Self::Protocol { status, .. } => *status,
            Self::Internal { .. } => 500,
        }
    }

    /// SCIM `scimType` keyword, when the error has one.
    pub fn scim_type(&self) -> Option<&str> {
        match self {
            Self::FormatNotSupported { .. } | Self::Json(_) => Some("invalidSyntax"),
            Self::InvalidRequest { .. } => Some("invalidValue"),
            Self::InvalidFilter { .. } => Some("invalidFilter"),
            Self::Uniqueness { .. } => Some("uniqueness"),
            Self::Protocol { scim_type, .. } => scim_type.as_deref(),
            Self::UnsupportedMediaType { .. }
            | Self::ResourceNotFound { .. }
            | Self::Internal { .. } => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FormatNotSupported { .. } | Self::UnsupportedMediaType { .. } | Self::Json(_) => {
                ErrorKind::Format
            }
            Self::Internal { .. } => ErrorKind::Internal,
            Self::Protocol { status, .. } if *status >= 500 => ErrorKind::Internal,
            _ => ErrorKind::Protocol,
        }
    }

    /// Render the SCIM error message body (RFC 7644 section 3.12).
    pub fn to_scim_body(&self) -> Value {
        let mut body = json!({
            "schemas": [ERROR_SCHEMA],
            "status": self.status().to_string(),
            "detail": self.to_string(),
        });
        if let Some(scim_type) = self.scim_type() {
            body["scimType"] = Value::String(scim_type.to_string());
        }
        body
    }

    /// Encode this error as a delegate response envelope.
    pub fn to_response(&self) -> ScimResponse {
        ScimResponse::new(self.status())
            .with_header("Content-Type", SCIM_MEDIA_TYPE)
            .with_body(self.to_scim_body().to_string())
    }
}

// Result type aliases for convenience
pub type ScimResult<T> = Result<T, ScimError>;
pub type BuildResult<T> = Result<T, BuildError>;
