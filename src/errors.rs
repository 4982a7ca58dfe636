use std::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeosErrorType {
    NotFound,
    AlreadyExists,
    InvalidPath,
    NotPermitted,
    InvalidCommand,
    IOError,
    InternalError,
}

/// Error type for the surfaces that actually report failures: the shell and
/// configuration loading. The core stores (file system, window manager) keep
/// the silent no-op policy and never construct one of these.
#[derive(Debug)]
pub struct TreeosError {
    pub error_type: TreeosErrorType,
    pub message: String,
}

impl TreeosError {
    pub fn new(error_type: TreeosErrorType, message: String) -> Self {
        Self {
            error_type,
            message,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(TreeosErrorType::NotFound, message.into())
    }

    pub fn invalid_command(message: impl Into<String>) -> Self {
        Self::new(TreeosErrorType::InvalidCommand, message.into())
    }
}

impl std::fmt::Display for TreeosError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.error_type, self.message)
    }
}

impl From<std::io::Error> for TreeosError {
    fn from(error: std::io::Error) -> Self {
        Self {
            error_type: TreeosErrorType::IOError,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for TreeosError {
    fn from(error: serde_json::Error) -> Self {
        Self {
            error_type: TreeosErrorType::InvalidPath,
            message: error.to_string(),
        }
    }
}

impl Error for TreeosError {}

pub type Result<T> = std::result::Result<T, TreeosError>;
