use thiserror::Error;

/// Unified error type for release-bump operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing input: {0}")]
    Input(String),

    #[error("Cannot parse manifest '{path}': {source}")]
    Manifest {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot access '{path}': {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Tag '{0}' not found")]
    TagNotFound(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),
}

/// Convenience type alias for Results in release-bump
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a missing-input error
    pub fn input(msg: impl Into<String>) -> Self {
        ReleaseError::Input(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }

    /// Create a remote error with context
    pub fn remote(msg: impl Into<String>) -> Self {
        ReleaseError::Remote(msg.into())
    }

    /// Wrap an I/O error with the path it happened on
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        ReleaseError::File {
            path: path.into(),
            source,
        }
    }

    /// Wrap a JSON error with the manifest it came from
    pub fn manifest(path: impl Into<String>, source: serde_json::Error) -> Self {
        ReleaseError::Manifest {
            path: path.into(),
            source,
        }
    }

    /// True when the error only says a tag was absent
    pub fn is_tag_not_found(&self) -> bool {
        matches!(self, ReleaseError::TagNotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReleaseError::config("no product name");
        assert_eq!(err.to_string(), "Configuration error: no product name");
    }

    #[test]
    fn test_file_error_names_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ReleaseError::file("package.json", io_err);
        let msg = err.to_string();
        assert!(msg.contains("package.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_manifest_error_names_path() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let err = ReleaseError::manifest("config.json", json_err);
        assert!(err.to_string().starts_with("Cannot parse manifest 'config.json'"));
    }

    #[test]
    fn test_tag_not_found_detection() {
        assert!(ReleaseError::TagNotFound("v1.0.0".to_string()).is_tag_not_found());
        assert!(!ReleaseError::tag("v1.0.0").is_tag_not_found());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (ReleaseError::config("x"), "Configuration error"),
            (ReleaseError::input("x"), "Missing input"),
            (ReleaseError::tag("x"), "Tag error"),
            (ReleaseError::remote("x"), "Remote operation failed"),
            (ReleaseError::TagNotFound("x".to_string()), "Tag 'x' not found"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
