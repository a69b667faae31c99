//! Error types for the generation pipeline.

use serde::Serialize;
use thiserror::Error;

/// Closed taxonomy of failure kinds surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    NetworkUnreachable,
    Timeout,
    AuthInvalid,
    PermissionDenied,
    RateLimited,
    ServerFault,
    MalformedResponse,
    EmptyResult,
    InvalidInput,
    Unknown,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 10] = [
        ErrorKind::NetworkUnreachable,
        ErrorKind::Timeout,
        ErrorKind::AuthInvalid,
        ErrorKind::PermissionDenied,
        ErrorKind::RateLimited,
        ErrorKind::ServerFault,
        ErrorKind::MalformedResponse,
        ErrorKind::EmptyResult,
        ErrorKind::InvalidInput,
        ErrorKind::Unknown,
    ];

    /// Stable snake_case name, used in logs and diagnostics.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NetworkUnreachable => "network_unreachable",
            ErrorKind::Timeout => "timeout",
            ErrorKind::AuthInvalid => "auth_invalid",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::ServerFault => "server_fault",
            ErrorKind::MalformedResponse => "malformed_response",
            ErrorKind::EmptyResult => "empty_result",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure of a generation request.
///
/// Every variant maps to exactly one [`ErrorKind`] and carries a message that
/// is safe to show to an end user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// No response reached us (DNS, refused connection, dropped socket).
    #[error("Network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// Missing, rejected or unauthorised credential.
    #[error("Authentication failed: {0}")]
    AuthInvalid(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Provider/proxy side failure (5xx or an explicit error record).
    #[error("Server fault: {message}")]
    ServerFault { status: Option<u16>, message: String },

    /// A successful response whose body does not have the expected shape.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A successful response that carried no usable text.
    #[error("Empty result: {0}")]
    EmptyResult(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl GenerationError {
    /// Create a server fault with an optional HTTP status.
    pub fn server_fault(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::ServerFault {
            status,
            message: message.into(),
        }
    }

    /// Build an error of the given kind. `ServerFault` gets no status.
    pub fn from_kind(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        match kind {
            ErrorKind::NetworkUnreachable => Self::NetworkUnreachable(message),
            ErrorKind::Timeout => Self::Timeout(message),
            ErrorKind::AuthInvalid => Self::AuthInvalid(message),
            ErrorKind::PermissionDenied => Self::PermissionDenied(message),
            ErrorKind::RateLimited => Self::RateLimited(message),
            ErrorKind::ServerFault => Self::server_fault(None, message),
            ErrorKind::MalformedResponse => Self::MalformedResponse(message),
            ErrorKind::EmptyResult => Self::EmptyResult(message),
            ErrorKind::InvalidInput => Self::InvalidInput(message),
            ErrorKind::Unknown => Self::Unknown(message),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NetworkUnreachable(_) => ErrorKind::NetworkUnreachable,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::AuthInvalid(_) => ErrorKind::AuthInvalid,
            Self::PermissionDenied(_) => ErrorKind::PermissionDenied,
            Self::RateLimited(_) => ErrorKind::RateLimited,
            Self::ServerFault { .. } => ErrorKind::ServerFault,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::EmptyResult(_) => ErrorKind::EmptyResult,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// The user-facing message without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::NetworkUnreachable(m)
            | Self::Timeout(m)
            | Self::AuthInvalid(m)
            | Self::PermissionDenied(m)
            | Self::RateLimited(m)
            | Self::MalformedResponse(m)
            | Self::EmptyResult(m)
            | Self::InvalidInput(m)
            | Self::Unknown(m) => m,
            Self::ServerFault { message, .. } => message,
        }
    }

    /// The `(kind, message)` pair handed to presentation layers.
    pub fn into_parts(self) -> (ErrorKind, String) {
        let kind = self.kind();
        let message = self.message().to_string();
        (kind, message)
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ServerFault { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether trying again later could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NetworkUnreachable
                | ErrorKind::Timeout
                | ErrorKind::RateLimited
                | ErrorKind::ServerFault
        )
    }

    /// Prefix the message with extra context, keeping the kind.
    pub fn with_context(self, context: impl AsRef<str>) -> Self {
        let context = context.as_ref();
        if context.is_empty() {
            return self;
        }
        match self {
            Self::ServerFault { status, message } => Self::ServerFault {
                status,
                message: format!("{context}; {message}"),
            },
            other => {
                let kind = other.kind();
                Self::from_kind(kind, format!("{context}; {}", other.message()))
            }
        }
    }
}
