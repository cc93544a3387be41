//! Error types for artifact cache operations.

use std::path::PathBuf;

/// Errors that can occur while persisting a stylesheet artifact.
///
/// Reads are fail-safe and never produce an error: a missing or unreadable
/// artifact is reported as absent content. Only directory creation and
/// writes fail the caller.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The directories leading to an artifact could not be created.
    #[error("failed to create cache directory {path}: {source}")]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The artifact file could not be written.
    #[error("failed to write artifact {path}: {source}")]
    Write {
        /// The artifact file path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_dir_display() {
        let err = CacheError::CreateDir {
            path: PathBuf::from("/tmp/.linaria-cache/src"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("failed to create cache directory"));
        assert!(msg.contains(".linaria-cache/src"));
    }

    #[test]
    fn write_display() {
        let err = CacheError::Write {
            path: PathBuf::from("a.linaria.css"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        let msg = err.to_string();
        assert!(msg.contains("failed to write artifact"));
        assert!(msg.contains("a.linaria.css"));
        assert!(msg.contains("disk full"));
    }
}
