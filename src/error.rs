use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the lnegc library.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum Error {
    /// IO error with context about the file path.
    #[error("IO error accessing '{path}': {message}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// Error message
        message: String,
    },

    /// A document file or the project directory does not exist.
    #[error("File not found: '{path}'")]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// No configuration document was found at any probed location.
    #[error(
        "Configuration file not found. Tried the following paths:\n{}",
        display_paths(.candidates)
    )]
    ConfigNotFound {
        /// Every path that was probed, in probe order
        candidates: Vec<PathBuf>,
    },

    /// Invalid UTF-8 encountered in a document.
    #[error("Invalid UTF-8 encoding in file '{path}'. Documents must be UTF-8 text.")]
    InvalidUtf8 {
        /// Path to file with encoding issues
        path: PathBuf,
    },

    /// Template registration or rendering error.
    #[error("Failed to render template '{template}': {message}")]
    Template {
        /// Template name
        template: String,
        /// Error message
        message: String,
    },

    /// A user supplied template was rejected.
    #[error("Invalid template '{template}': {message}")]
    TemplateValidation {
        /// Template path or name
        template: String,
        /// Reason for rejection
        message: String,
    },

    /// Configuration validation error.
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// Invalid exclusion glob.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The invalid pattern
        pattern: String,
        /// Reason why it's invalid
        reason: String,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

impl Error {
    /// Creates an IO error with path context.
    ///
    /// `NotFound` and `InvalidData` IO errors are mapped to
    /// [`Error::NotFound`] and [`Error::InvalidUtf8`].
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            std::io::ErrorKind::InvalidData => Self::InvalidUtf8 { path },
            _ => Self::Io {
                path,
                message: source.to_string(),
            },
        }
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Creates a configuration-not-found error listing every probed path.
    #[must_use]
    pub fn config_not_found(candidates: Vec<PathBuf>) -> Self {
        Self::ConfigNotFound { candidates }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates a template error.
    #[must_use]
    pub fn template(template: impl Into<String>, source: tera::Error) -> Self {
        // tera keeps the useful part of the message in the source chain
        let mut message = source.to_string();
        let mut cause = std::error::Error::source(&source);
        while let Some(inner) = cause {
            message.push_str(": ");
            message.push_str(&inner.to_string());
            cause = inner.source();
        }

        Self::Template {
            template: template.into(),
            message,
        }
    }

    /// Creates a template validation error.
    #[must_use]
    pub fn template_validation(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TemplateValidation {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid pattern error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if a file, directory or configuration document was missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::ConfigNotFound { .. })
    }

    /// Returns true if a document was not valid UTF-8.
    #[must_use]
    pub const fn is_decoding(&self) -> bool {
        matches!(self, Self::InvalidUtf8 { .. })
    }

    /// Returns true if this is a generic IO error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// Returns true if this is a configuration error.
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::InvalidPattern { .. })
    }

    /// Returns the path this error refers to, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. } | Self::NotFound { path } | Self::InvalidUtf8 { path } => {
                Some(path)
            }
            _ => None,
        }
    }
}

impl From<tera::Error> for Error {
    fn from(e: tera::Error) -> Self {
        Self::template("unknown", e)
    }
}
