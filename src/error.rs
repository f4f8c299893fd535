//! Error types for ReelKit

use thiserror::Error;

/// Result type alias for ReelKit operations
pub type Result<T> = std::result::Result<T, Error>;

/// ReelKit error type
#[derive(Error, Debug)]
pub enum Error {
    // Engine errors
    #[error("Engine not available: {0}")]
    EngineNotAvailable(String),

    // Render errors
    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    // General errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Render(_))
    }

    /// Check if this error means the engine binary is missing or broken
    pub fn is_engine_issue(&self) -> bool {
        matches!(self, Error::EngineNotAvailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_helpers() {
        assert!(Error::Render("draw failed".into()).is_recoverable());
        assert!(!Error::InvalidFrame("too small".into()).is_recoverable());

        assert!(Error::EngineNotAvailable("ffmpeg".into()).is_engine_issue());
        assert!(!Error::Config("bad toml".into()).is_engine_issue());
    }
}
