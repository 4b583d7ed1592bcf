use thiserror::Error;

/// Main error type for the fieldcap engine
#[derive(Error, Debug)]
pub enum FieldcapError {
    #[error("Text recognition failed for page {page_number}: {message}")]
    Recognition {
        page_number: u32,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("File I/O error: {path}")]
    FileIO {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("General error: {0}")]
    General(#[from] anyhow::Error),
}

impl FieldcapError {
    /// Create a recognition error with context
    pub fn recognition(page_number: u32, message: impl Into<String>) -> Self {
        Self::Recognition {
            page_number,
            message: message.into(),
            source: None,
        }
    }

    /// Create a recognition error with source
    pub fn recognition_with_source(
        page_number: u32,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Recognition {
            page_number,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a file I/O error
    pub fn file_io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileIO {
            path: path.into(),
            source,
        }
    }

    /// Check if error is recoverable (can continue operation)
    pub fn is_recoverable(&self) -> bool {
        match self {
            // A failed recognition pass leaves the page without a result;
            // the caller is free to retry.
            FieldcapError::Recognition { .. } => true,
            FieldcapError::Configuration { .. } => true,
            FieldcapError::FileIO { .. } => false,
            FieldcapError::General(_) => true,
        }
    }
}

/// Result type alias for fieldcap operations
pub type FieldcapResult<T> = Result<T, FieldcapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognition_error_names_page() {
        let err = FieldcapError::recognition(3, "engine returned no tokens");
        assert!(err.to_string().contains("page 3"));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_file_io_not_recoverable() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = FieldcapError::file_io("fieldcap.toml", io);
        assert!(!err.is_recoverable());
    }
}
