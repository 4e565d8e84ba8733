//! Error types for the FBX exporter.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for export operations.
///
/// Every error is fatal to the current export; nothing is retried and a
/// partially written file is not cleaned up. Callers should discard the
/// output on error.
#[derive(Error, Debug)]
pub enum Error {
    /// Output file could not be opened
    #[error("could not open output file: {0}")]
    Open(PathBuf),

    /// Input uses a feature the exporter cannot express
    #[error("unsupported feature: {0}")]
    Unsupported(String),

    /// A synthetic transform-chain node must have exactly one child
    #[error("transform chain node \"{node}\" has {children} children, expected 1")]
    MalformedTransformChain { node: String, children: usize },

    /// A property cannot be emitted in the requested output mode.
    /// Indicates a construction bug in the caller's record tree.
    #[error("property with type tag '{0}' cannot be emitted here")]
    InvalidProperty(char),

    /// Sink write/seek failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an unsupported-feature error from a message.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }
}

/// Result type alias for export operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = Error::Unsupported("multilayer textures".to_string());
        assert!(e.to_string().contains("multilayer"));

        let e = Error::MalformedTransformChain {
            node: "X_$AssimpFbx$_Rotation".to_string(),
            children: 2,
        };
        assert!(e.to_string().contains("2 children"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
