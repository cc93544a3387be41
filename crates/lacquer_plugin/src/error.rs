//! Error types for plugin construction and transforms.

use lacquer_cache::CacheError;
use lacquer_config::ConfigError;

use crate::extractor::ExtractorError;

/// Errors surfaced to the host by the plugin.
///
/// Skipped modules are not errors; see [`SkipReason`](crate::SkipReason).
/// A failed transform leaves the virtual module registry untouched.
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The configuration handed to the plugin is invalid.
    #[error("invalid plugin configuration: {0}")]
    Config(#[from] ConfigError),

    /// The working directory could not be determined.
    #[error("failed to determine working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    /// The style extractor rejected the module.
    #[error("style extraction failed for {id}: {source}")]
    Extractor {
        /// The module id being transformed.
        id: String,
        /// The extractor's own error, unchanged.
        source: ExtractorError,
    },

    /// The stylesheet artifact could not be persisted.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::path::PathBuf;

    #[test]
    fn extractor_error_keeps_source() {
        let err = PluginError::Extractor {
            id: "/ws/src/a.ts".to_string(),
            source: "unexpected token".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/ws/src/a.ts"));
        assert!(msg.contains("unexpected token"));
        assert_eq!(err.source().unwrap().to_string(), "unexpected token");
    }

    #[test]
    fn cache_error_is_transparent() {
        let err: PluginError = CacheError::Write {
            path: PathBuf::from("a.linaria.css"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        }
        .into();
        assert!(err.to_string().starts_with("failed to write artifact"));
    }

    #[test]
    fn config_error_display() {
        let err: PluginError = ConfigError::MissingField("extension".to_string()).into();
        assert_eq!(
            err.to_string(),
            "invalid plugin configuration: missing required option: extension"
        );
    }
}
