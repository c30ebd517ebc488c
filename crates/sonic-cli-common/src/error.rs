//! Error types for store and platform operations.

use thiserror::Error;

/// Errors from database store operations.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("Redis connection error: {0}")]
    Connection(String),

    #[error("Redis command error: {0}")]
    Command(String),

    #[error("Invalid data format: {0}")]
    InvalidData(String),
}

/// Result type for store operations.
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Errors from platform topology loading.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Failed to read port config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed port config line {line}: {message}")]
    Parse { line: usize, message: String },
}

impl PlatformError {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a parse error for the given 1-based line number.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result type for platform operations.
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_display() {
        let err = DbError::Connection("redis://127.0.0.1:6379/4: refused".to_string());
        assert_eq!(
            err.to_string(),
            "Redis connection error: redis://127.0.0.1:6379/4: refused"
        );

        let err = DbError::Command("HGETALL failed: timeout".to_string());
        assert_eq!(err.to_string(), "Redis command error: HGETALL failed: timeout");
    }

    #[test]
    fn test_platform_error_display() {
        let err = PlatformError::parse(17, "missing port name column");
        assert_eq!(
            err.to_string(),
            "Malformed port config line 17: missing port name column"
        );
    }
}
