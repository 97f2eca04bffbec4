//! Centralized error handling for hwdash

use std::io;
use thiserror::Error;

/// Error type for provider queries and configuration loading
#[derive(Error, Debug)]
pub enum HwdashError {
    /// I/O errors (file reading, command execution)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Parsing errors (invalid data format)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Hardware detection errors
    #[error("Detection error: {0}")]
    Detection(String),

    /// The provider cannot answer on this host (missing table, no permission)
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl HwdashError {
    /// Whether this error means "the capability is absent or denied" rather
    /// than an unexpected fault.
    pub fn is_unavailable(&self) -> bool {
        match self {
            HwdashError::Unavailable(_) => true,
            HwdashError::Io(err) => matches!(
                err.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied
            ),
            _ => false,
        }
    }
}

impl From<toml::de::Error> for HwdashError {
    fn from(error: toml::de::Error) -> Self {
        HwdashError::Config(error.to_string())
    }
}

/// Type alias for Results in hwdash
pub type Result<T> = std::result::Result<T, HwdashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_is_unavailable() {
        let err = HwdashError::from(io::Error::new(io::ErrorKind::PermissionDenied, "dmi"));
        assert!(err.is_unavailable());
    }

    #[test]
    fn parse_error_is_a_fault() {
        let err = HwdashError::Parse("bad smbios entry".to_string());
        assert!(!err.is_unavailable());
        assert_eq!(err.to_string(), "Parse error: bad smbios entry");
    }
}
