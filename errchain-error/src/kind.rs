//! Error kinds for errchain

use std::fmt;

/// The kind of error that occurred.
///
/// A kind is the structural tag of one node in an error chain. Matching a
/// chain against a kind is a plain discriminant comparison, so callers can
/// ask "is there a connection failure somewhere below this?" without
/// unwrapping each layer by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// The requested feature or operation is not supported
    Unsupported,

    /// Invalid argument passed to function
    InvalidArgument,

    // =========================================================================
    // Protocol errors
    // =========================================================================
    /// The peer answered with something we did not expect
    UnexpectedResponse,

    // =========================================================================
    // Connection errors
    // =========================================================================
    /// The connection to the peer failed
    Connection,

    /// The peer reset the connection
    ConnectionResetByPeer,

    /// The operation did not finish in time
    TimedOut,

    // =========================================================================
    // Resource errors
    // =========================================================================
    /// Permission denied
    PermissionDenied,

    /// The resource already exists
    AlreadyExists,

    /// The resource does not exist
    NotFound,

    /// The resource was already closed
    Closed,
}

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 11] = [
        ErrorKind::Unexpected,
        ErrorKind::Unsupported,
        ErrorKind::InvalidArgument,
        ErrorKind::UnexpectedResponse,
        ErrorKind::Connection,
        ErrorKind::ConnectionResetByPeer,
        ErrorKind::TimedOut,
        ErrorKind::PermissionDenied,
        ErrorKind::AlreadyExists,
        ErrorKind::NotFound,
        ErrorKind::Closed,
    ];

    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            // General
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::Unsupported => "Unsupported",
            ErrorKind::InvalidArgument => "InvalidArgument",

            // Protocol
            ErrorKind::UnexpectedResponse => "UnexpectedResponse",

            // Connection
            ErrorKind::Connection => "Connection",
            ErrorKind::ConnectionResetByPeer => "ConnectionResetByPeer",
            ErrorKind::TimedOut => "TimedOut",

            // Resource
            ErrorKind::PermissionDenied => "PermissionDenied",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::Closed => "Closed",
        }
    }

    /// Human-readable text used when a node carries no detail of its own.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::Unexpected => "Unexpected error",
            ErrorKind::Unsupported => "Operation not supported",
            ErrorKind::InvalidArgument => "Invalid argument",
            ErrorKind::UnexpectedResponse => "Unexpected response",
            ErrorKind::Connection => "Connection error",
            ErrorKind::ConnectionResetByPeer => "Connection reset by peer",
            ErrorKind::TimedOut => "Timed out",
            ErrorKind::PermissionDenied => "Permission denied",
            ErrorKind::AlreadyExists => "Already exists",
            ErrorKind::NotFound => "Not found",
            ErrorKind::Closed => "Already closed",
        }
    }

    /// Check if this error kind is retryable by default
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Connection | ErrorKind::ConnectionResetByPeer | ErrorKind::TimedOut
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
