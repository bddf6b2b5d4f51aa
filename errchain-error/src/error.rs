//! The main Error type for errchain

use crate::chain::{Chain, Link};
use crate::{ErrorKind, ErrorStatus, Sentinel};
use std::fmt;

/// Rendering used when no link of a chain has any text.
pub(crate) const UNSPECIFIED: &str = "unspecified error";

/// The cause owned by an [`Error`] node.
///
/// A node owns its cause exclusively, so a chain can never contain a cycle.
#[derive(Debug)]
pub enum Cause {
    /// Another errchain node
    Error(Box<Error>),
    /// A sentinel, kept by reference so identity survives wrapping
    Sentinel(&'static Sentinel),
    /// Any other error
    Foreign(anyhow::Error),
}

impl Cause {
    /// Wrap a foreign error as a cause
    pub fn foreign<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Cause::Foreign(anyhow::Error::new(err))
    }

    pub(crate) fn link(&self) -> Link<'_> {
        match self {
            Cause::Error(err) => Link::Node(err),
            Cause::Sentinel(sentinel) => Link::Sentinel(sentinel),
            Cause::Foreign(err) => {
                let inner: &(dyn std::error::Error + 'static) = err.as_ref();
                Link::from_dyn(inner)
            }
        }
    }
}

impl From<Error> for Cause {
    fn from(err: Error) -> Self {
        Cause::Error(Box::new(err))
    }
}

impl From<&'static Sentinel> for Cause {
    fn from(sentinel: &'static Sentinel) -> Self {
        Cause::Sentinel(sentinel)
    }
}

impl From<anyhow::Error> for Cause {
    fn from(err: anyhow::Error) -> Self {
        Cause::Foreign(err)
    }
}

/// One node of an error chain.
///
/// Each node carries:
/// - `kind`: what type of error occurred, or `None` for a plain text layer
/// - `message`: human-readable detail, may be empty
/// - `status`: whether the error is retryable
/// - `operation`: what operation caused the error
/// - `context`: key-value pairs for debugging
/// - `source`: the owned cause (if any)
///
/// # Example
///
/// ```rust
/// use errchain_error::{Error, ErrorKind};
///
/// let err = Error::new(ErrorKind::UnexpectedResponse, "")
///     .with_operation("client::fetch")
///     .with_context("status", "502")
///     .set_source(Error::connection(Error::connection_reset_by_peer()));
///
/// assert!(err.is_kind(ErrorKind::ConnectionResetByPeer));
/// assert_eq!(
///     err.describe(),
///     "Unexpected response: Connection error: Connection reset by peer"
/// );
/// ```
pub struct Error {
    kind: Option<ErrorKind>,
    message: String,
    status: ErrorStatus,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<Cause>,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let status = if kind.is_retryable() {
            ErrorStatus::Temporary
        } else {
            ErrorStatus::Permanent
        };

        Self {
            kind: Some(kind),
            message: message.into(),
            status,
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    /// Create a neutral text layer with no kind
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            kind: None,
            message: message.into(),
            status: ErrorStatus::Permanent,
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the error kind, `None` for a text layer
    pub fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the error status
    pub fn status(&self) -> ErrorStatus {
        self.status
    }

    /// Get the operation that caused this error
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the context key-value pairs
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Get the direct cause (if any)
    pub fn cause(&self) -> Option<Link<'_>> {
        self.source.as_ref().map(Cause::link)
    }

    /// Text this node contributes to a description: its message, or the
    /// kind's description when the message is empty.
    pub(crate) fn own_text(&self) -> Option<&str> {
        if !self.message.is_empty() {
            Some(&self.message)
        } else {
            self.kind.map(|kind| kind.description())
        }
    }

    // =========================================================================
    // Builders (chainable)
    // =========================================================================

    /// Mark as temporary (retryable)
    pub fn temporary(mut self) -> Self {
        self.status = ErrorStatus::Temporary;
        self
    }

    /// Set the operation that caused this error.
    ///
    /// If an operation was already set, the previous one is moved to context
    /// as "called" to preserve the call chain.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the cause.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if a cause was already set.
    pub fn set_source(mut self, source: impl Into<Cause>) -> Self {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(source.into());
        self
    }

    // =========================================================================
    // Status mutations
    // =========================================================================

    /// Mark as persistent after failed retries
    pub fn persist(mut self) -> Self {
        self.status = self.status.persist();
        self
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        self.status.is_retryable()
    }

    // =========================================================================
    // Chain queries
    // =========================================================================

    /// Iterate the chain, starting with this node and ending at the root cause
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(Link::Node(self))
    }

    /// Whether any node in the chain has the given kind
    pub fn is_kind(&self, kind: ErrorKind) -> bool {
        self.chain().any(|link| link.kind() == Some(kind))
    }

    /// Whether the chain contains exactly this sentinel
    pub fn is_sentinel(&self, target: &Sentinel) -> bool {
        self.chain().any(|link| link.is(target))
    }

    /// First node in the chain with the given kind
    pub fn find_kind(&self, kind: ErrorKind) -> Option<&Error> {
        self.chain()
            .filter_map(|link| link.as_error())
            .find(|err| err.kind == Some(kind))
    }

    /// The innermost link of the chain
    pub fn root_cause(&self) -> Link<'_> {
        let mut link = Link::Node(self);
        while let Some(next) = link.cause() {
            link = next;
        }
        link
    }

    /// Number of links in the chain, this node included
    pub fn depth(&self) -> usize {
        self.chain().count()
    }

    /// Render the whole chain as `"outer: middle: root"`
    pub fn describe(&self) -> String {
        format!("{:#}", self)
    }
}

// =============================================================================
// Display - `{}` renders this node, `{:#}` renders the whole chain
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return f.write_str(self.own_text().unwrap_or(UNSPECIFIED));
        }

        let mut wrote = false;
        for link in self.chain() {
            if let Some(text) = link.text() {
                if wrote {
                    f.write_str(": ")?;
                }
                f.write_str(&text)?;
                wrote = true;
            }
        }

        if !wrote {
            f.write_str(UNSPECIFIED)?;
        }

        Ok(())
    }
}

// =============================================================================
// Debug - verbose, multi-line format for debugging
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind.map(|k| k.as_str()).unwrap_or("Text");
        write!(f, "{} ({})", kind, self.status)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }
        writeln!(f)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if self.source.is_some() {
            writeln!(f)?;
            writeln!(f, "    Caused by:")?;
            for (i, link) in self.chain().skip(1).enumerate() {
                let text = link.text().unwrap_or_default();
                match link.kind() {
                    Some(kind) => writeln!(f, "        {}: [{}] {}", i, kind, text)?,
                    None => writeln!(f, "        {}: {}", i, text)?,
                }
            }
        }

        Ok(())
    }
}

// =============================================================================
// Drop - unlink the chain one node at a time instead of recursing
// =============================================================================

impl Drop for Error {
    fn drop(&mut self) {
        let mut next = self.source.take();
        while let Some(Cause::Error(mut inner)) = next {
            next = inner.source.take();
        }
    }
}

// =============================================================================
// std::error::Error implementation
// =============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.source.as_ref()? {
            Cause::Error(err) => Some(&**err as &(dyn std::error::Error + 'static)),
            Cause::Sentinel(sentinel) => Some(*sentinel as &(dyn std::error::Error + 'static)),
            Cause::Foreign(err) => {
                let inner: &(dyn std::error::Error + 'static) = err.as_ref();
                Some(inner)
            }
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind, "")
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind as Io;

        let kind = match err.kind() {
            Io::NotFound => ErrorKind::NotFound,
            Io::PermissionDenied => ErrorKind::PermissionDenied,
            Io::AlreadyExists => ErrorKind::AlreadyExists,
            Io::InvalidInput => ErrorKind::InvalidArgument,
            Io::TimedOut => ErrorKind::TimedOut,
            Io::Unsupported => ErrorKind::Unsupported,
            Io::ConnectionReset => ErrorKind::ConnectionResetByPeer,
            Io::ConnectionRefused
            | Io::ConnectionAborted
            | Io::NotConnected
            | Io::BrokenPipe => ErrorKind::Connection,
            _ => ErrorKind::Unexpected,
        };
        Error::new(kind, "")
            .with_operation("io")
            .set_source(Cause::foreign(err))
    }
}

// =============================================================================
// Convenience constructors
// =============================================================================

impl Error {
    /// Create an UnexpectedResponse error around its cause
    pub fn unexpected_response(cause: impl Into<Cause>) -> Self {
        Self::new(ErrorKind::UnexpectedResponse, "").set_source(cause)
    }

    /// Create a Connection error around its cause
    pub fn connection(cause: impl Into<Cause>) -> Self {
        Self::new(ErrorKind::Connection, "").set_source(cause)
    }

    /// Create a ConnectionResetByPeer error
    pub fn connection_reset_by_peer() -> Self {
        Self::new(ErrorKind::ConnectionResetByPeer, "")
    }

    /// Create an Unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentinel::CONNECTION_RESET_BY_PEER;

    #[test]
    fn test_error_creation() {
        let err = Error::new(ErrorKind::UnexpectedResponse, "status 502");
        assert_eq!(err.kind(), Some(ErrorKind::UnexpectedResponse));
        assert_eq!(err.message(), "status 502");
        assert_eq!(err.status(), ErrorStatus::Permanent);
        assert!(err.cause().is_none());
    }

    #[test]
    fn test_text_layer_is_neutral() {
        let err = Error::text("Connection error");
        assert_eq!(err.kind(), None);
        assert_eq!(err.status(), ErrorStatus::Permanent);
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::new(ErrorKind::Connection, "handshake failed")
            .with_operation("client::connect")
            .with_context("host", "db.internal")
            .with_context("port", "5432");

        assert_eq!(err.operation(), "client::connect");
        assert_eq!(err.context().len(), 2);
        assert_eq!(err.context()[0], ("host", "db.internal".to_string()));
    }

    #[test]
    fn test_operation_chaining() {
        let err = Error::new(ErrorKind::Connection, "write failed")
            .with_operation("socket::write")
            .with_operation("client::send");

        assert_eq!(err.operation(), "client::send");
        assert_eq!(err.context().len(), 1);
        assert_eq!(err.context()[0], ("called", "socket::write".to_string()));
    }

    #[test]
    fn test_temporary_status() {
        let err = Error::connection_reset_by_peer();
        assert!(err.is_retryable());

        let err = Error::new(ErrorKind::NotFound, "no route");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_persist() {
        let err = Error::new(ErrorKind::UnexpectedResponse, "bad frame").temporary();
        assert!(err.is_retryable());

        let err = err.persist();
        assert!(!err.is_retryable());
        assert_eq!(err.status(), ErrorStatus::Persistent);
    }

    #[test]
    fn test_display_node_and_chain() {
        let err = Error::unexpected_response(Error::connection(Error::connection_reset_by_peer()));

        assert_eq!(format!("{}", err), "Unexpected response");
        assert_eq!(
            format!("{:#}", err),
            "Unexpected response: Connection error: Connection reset by peer"
        );
        assert_eq!(err.to_string(), "Unexpected response");
    }

    #[test]
    fn test_display_prefers_message_over_kind() {
        let err = Error::new(ErrorKind::Connection, "dial tcp 10.0.0.1:443");
        assert_eq!(err.to_string(), "dial tcp 10.0.0.1:443");
    }

    #[test]
    fn test_empty_text_layer_is_skipped_in_description() {
        let err = Error::text("").set_source(&CONNECTION_RESET_BY_PEER);
        assert_eq!(err.describe(), "connection reset by peer");
        assert_eq!(err.to_string(), UNSPECIFIED);
    }

    #[test]
    fn test_description_never_empty() {
        assert_eq!(Error::text("").describe(), UNSPECIFIED);
    }

    #[test]
    fn test_debug_lists_causes() {
        let err = Error::unexpected_response(Error::connection(Error::connection_reset_by_peer()))
            .with_operation("client::fetch")
            .with_context("attempt", "3");

        let debug = format!("{:?}", err);
        assert!(debug.contains("UnexpectedResponse (permanent) at client::fetch"));
        assert!(debug.contains("attempt: 3"));
        assert!(debug.contains("0: [Connection] Connection error"));
        assert!(debug.contains("1: [ConnectionResetByPeer] Connection reset by peer"));
    }

    #[test]
    fn test_std_source_chain() {
        use std::error::Error as _;

        let err = Error::text("Unexpected response")
            .set_source(Error::text("Connection error").set_source(&CONNECTION_RESET_BY_PEER));

        let mid = err.source().map(|e| e.to_string());
        assert_eq!(mid.as_deref(), Some("Connection error"));

        let root = err.source().and_then(|e| e.source()).map(|e| e.to_string());
        assert_eq!(root.as_deref(), Some("connection reset by peer"));
    }

    #[test]
    fn test_find_kind_returns_node() {
        let err = Error::unexpected_response(
            Error::new(ErrorKind::Connection, "dial failed")
                .with_context("host", "api")
                .set_source(Error::connection_reset_by_peer()),
        );

        let found = err.find_kind(ErrorKind::Connection).map(Error::message);
        assert_eq!(found, Some("dial failed"));
        assert!(err.find_kind(ErrorKind::TimedOut).is_none());
    }

    #[test]
    fn test_root_cause_and_depth() {
        let inner = Error::text("inner").set_source(&CONNECTION_RESET_BY_PEER);
        let err = Error::text("outer").set_source(inner);

        assert_eq!(err.depth(), 3);
        assert!(err.root_cause().is(&CONNECTION_RESET_BY_PEER));
        assert_eq!(Error::text("alone").depth(), 1);
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "os error 104");
        let err = Error::from(io_err);

        assert_eq!(err.kind(), Some(ErrorKind::ConnectionResetByPeer));
        assert_eq!(err.operation(), "io");
        assert!(err.is_retryable());
        assert_eq!(err.describe(), "Connection reset by peer: os error 104");
    }

    #[test]
    fn test_from_io_error_not_found() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml");
        let err: Error = io_err.into();
        assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    }

    #[test]
    fn test_from_kind() {
        let err: Error = ErrorKind::TimedOut.into();
        assert_eq!(err.kind(), Some(ErrorKind::TimedOut));
        assert_eq!(err.to_string(), "Timed out");
    }

    #[test]
    fn test_drop_very_deep_chain() {
        let mut err = Error::connection_reset_by_peer();
        for _ in 0..200_000 {
            err = Error::text("retry").set_source(err);
        }
        assert!(err.is_kind(ErrorKind::ConnectionResetByPeer));
        drop(err);
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<Error>();
    }
}
