use std::fmt;

use serde::{Deserialize, Serialize};

/// Uniform, display-facing description of a failed producer invocation.
///
/// Whatever error type a producer returns, an [`AsyncResource`](crate::AsyncResource)
/// stores only its rendered message so that every resource exposes the same
/// error shape to display surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Capture the rendered message of any displayable error.
    pub fn from_display<E: fmt::Display>(err: E) -> Self {
        Self::new(err.to_string())
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ErrorInfo {}

impl From<&str> for ErrorInfo {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for ErrorInfo {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}
