use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures raised by the external exposure-scoring engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Vendor API rejected the call with a status code.
    #[error("scoring engine API error (status {status_code}): {message}")]
    Api { status_code: i32, message: String },

    #[error("scoring engine unavailable: {0}")]
    Unavailable(String),
}

impl EngineError {
    /// Vendor status code, when the failure carries one.
    #[must_use]
    pub fn status_code(&self) -> Option<i32> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            Self::Unavailable(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("task scheduler error: {0}")]
    Scheduler(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        Error::Database(err.to_string())
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Database(format!("blocking task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_exposes_status_code() {
        let err = EngineError::Api {
            status_code: 39507,
            message: "rate limited".into(),
        };
        assert_eq!(err.status_code(), Some(39507));
        assert_eq!(EngineError::Unavailable("down".into()).status_code(), None);
    }

    #[test]
    fn config_error_is_transparent() {
        let err: Error = ConfigError::MissingField { field: "database" }.into();
        assert_eq!(err.to_string(), "missing required field: database");
    }
}
