//! Errors raised while reading or checking plugin options.
//!
//! Option problems are reported before the plugin processes any module, so
//! a misconfigured build fails once at startup instead of per module.

/// Errors that can occur when loading or validating plugin options.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `lacquer.toml` could not be read.
    #[error("failed to read plugin configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// `lacquer.toml` is not valid TOML, or an option has the wrong type.
    #[error("failed to parse plugin configuration: {0}")]
    ParseError(String),

    /// An option that must be non-empty was set to an empty value.
    #[error("missing required option: {0}")]
    MissingField(String),

    /// An option holds a value the plugin cannot use, such as a malformed
    /// glob or source-syntax pattern.
    #[error("invalid option: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cache_directory_names_the_option() {
        let err = ConfigError::MissingField("cache_directory".to_string());
        assert_eq!(format!("{err}"), "missing required option: cache_directory");
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = ConfigError::ParseError("expected '=' at line 3".to_string());
        assert_eq!(
            format!("{err}"),
            "failed to parse plugin configuration: expected '=' at line 3"
        );
    }

    #[test]
    fn bad_extension_is_reported_as_invalid_option() {
        let err = ConfigError::ValidationError("extension 'css' must start with '.'".to_string());
        assert_eq!(
            format!("{err}"),
            "invalid option: extension 'css' must start with '.'"
        );
    }

    #[test]
    fn missing_config_file_converts_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "lacquer.toml not found");
        let err: ConfigError = io_err.into();
        let display = format!("{err}");
        assert!(display.starts_with("failed to read plugin configuration:"));
        assert!(display.contains("lacquer.toml"));
    }
}
