use thiserror::Error;

/// Failure raised by a counter store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Structured failure reported by the store service itself, e.g.
    /// throttling, missing permissions or a failed condition.
    #[error("{code}: {message}")]
    Service { code: String, message: String },
    /// Anything else: transport failures, malformed stored values.
    #[error("{0}")]
    Unexpected(String),
}

impl StoreError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => Some(code),
            Self::Unexpected(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_keeps_code_and_message() {
        let error = StoreError::service("AccessDeniedException", "not allowed");

        assert_eq!(error.to_string(), "AccessDeniedException: not allowed");
        assert_eq!(error.code(), Some("AccessDeniedException"));
        assert_eq!(StoreError::unexpected("boom").code(), None);
    }
}
