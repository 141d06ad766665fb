use thiserror::Error;

/// Errors surfaced by the matching engine.
///
/// The first four kinds are recoverable and reported to the caller as-is.
/// `Backend` wraps transient backing-store failures; retry policy belongs
/// to the caller, the engine never retries.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("backing store failure: {0}")]
    Backend(String),
}

impl EngineError {
    /// HTTP status the route layer maps this error to.
    pub fn status_code(&self) -> u16 {
        match self {
            EngineError::NotFound(_) => 404,
            EngineError::Unauthorized(_) => 403,
            EngineError::Conflict(_) => 409,
            EngineError::InvalidInput(_) => 400,
            EngineError::Backend(_) => 500,
        }
    }

    /// Stable machine-readable kind for the JSON error envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::NotFound(_) => "not_found",
            EngineError::Unauthorized(_) => "unauthorized",
            EngineError::Conflict(_) => "conflict",
            EngineError::InvalidInput(_) => "invalid_input",
            EngineError::Backend(_) => "backend_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(EngineError::NotFound("x".into()).status_code(), 404);
        assert_eq!(EngineError::Unauthorized("x".into()).status_code(), 403);
        assert_eq!(EngineError::Conflict("x".into()).status_code(), 409);
        assert_eq!(EngineError::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(EngineError::Backend("x".into()).status_code(), 500);
    }
}
