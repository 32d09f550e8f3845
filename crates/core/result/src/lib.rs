use std::fmt;

/// Result type with custom Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// Type of error and additional information
    pub error_type: ErrorType,

    /// Where this error occurred
    pub location: String,
}

/// Possible error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorType {
    /// This error was not labeled :(
    LabelMe,

    // ? Startup related errors
    MissingToken,
    InvalidToken,
    ConnectionFailed {
        error: String,
    },

    // ? Platform related errors
    UnknownServer,
    UnknownMember,
    UnknownRole,
    InvalidId {
        id: String,
    },
    MissingPermission {
        operation: String,
    },
    PlatformError {
        operation: String,
        error: String,
    },

    // ? General errors
    NotFound,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorType::LabelMe => write!(f, "unlabeled error"),
            ErrorType::MissingToken => write!(f, "no bot token was provided"),
            ErrorType::InvalidToken => write!(f, "the bot token was rejected"),
            ErrorType::ConnectionFailed { error } => write!(f, "connection failed: {error}"),
            ErrorType::UnknownServer => write!(f, "unknown server"),
            ErrorType::UnknownMember => write!(f, "unknown member"),
            ErrorType::UnknownRole => write!(f, "unknown role"),
            ErrorType::InvalidId { id } => write!(f, "`{id}` is not a valid id"),
            ErrorType::MissingPermission { operation } => {
                write!(f, "missing permission for {operation}")
            }
            ErrorType::PlatformError { operation, error } => {
                write!(f, "{operation} failed: {error}")
            }
            ErrorType::NotFound => write!(f, "not found"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {})", self.error_type, self.location)
    }
}

impl std::error::Error for Error {}

#[macro_export]
macro_rules! create_error {
    ( $error: ident $( $tt:tt )? ) => {
        $crate::Error {
            error_type: $crate::ErrorType::$error $( $tt )?,
            location: format!("{}:{}:{}", file!(), line!(), column!()),
        }
    };
}

#[macro_export]
macro_rules! create_platform_error {
    ( $operation: expr, $error: expr ) => {
        $crate::create_error!(PlatformError {
            operation: $operation.to_string(),
            error: $error.to_string()
        })
    };
}
