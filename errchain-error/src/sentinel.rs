//! Identity-compared sentinel errors

use std::fmt;

/// A pre-allocated error value that is compared by identity.
///
/// Sentinels mark one specific low-level condition. Two sentinels are equal
/// only if they are the same `static`, so a sentinel created elsewhere with
/// the same message never matches. Declare sentinels as `static` items, not
/// `const`: every use of a `const` is a fresh value with its own address.
///
/// ```rust
/// use errchain_error::{wrap_text, Sentinel};
///
/// static ERR_EOF: Sentinel = Sentinel::new("end of stream");
///
/// let err = wrap_text("Reading header", &ERR_EOF);
/// assert!(err.is_sentinel(&ERR_EOF));
/// ```
#[derive(Debug)]
pub struct Sentinel {
    message: &'static str,
}

impl Sentinel {
    /// Create a sentinel. Only meaningful when bound to a `static`.
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }

    /// The fixed message of this sentinel
    pub fn message(&self) -> &'static str {
        self.message
    }

    /// Identity comparison
    pub fn is(&self, other: &Sentinel) -> bool {
        std::ptr::eq(self, other)
    }
}

impl PartialEq for Sentinel {
    fn eq(&self, other: &Self) -> bool {
        self.is(other)
    }
}

impl Eq for Sentinel {}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

impl std::error::Error for Sentinel {}

// =============================================================================
// Well-known sentinels
// =============================================================================

/// The peer reset the connection
pub static CONNECTION_RESET_BY_PEER: Sentinel = Sentinel::new("connection reset by peer");

/// Invalid argument
pub static INVALID: Sentinel = Sentinel::new("invalid argument");

/// Permission denied
pub static PERMISSION: Sentinel = Sentinel::new("permission denied");

/// File already exists
pub static EXIST: Sentinel = Sentinel::new("file already exists");

/// File does not exist
pub static NOT_EXIST: Sentinel = Sentinel::new("file does not exist");

/// The sentinel an I/O error of the given kind stands for, if any.
pub(crate) fn for_io_kind(kind: std::io::ErrorKind) -> Option<&'static Sentinel> {
    use std::io::ErrorKind as Io;

    match kind {
        Io::NotFound => Some(&NOT_EXIST),
        Io::PermissionDenied => Some(&PERMISSION),
        Io::AlreadyExists => Some(&EXIST),
        Io::InvalidInput => Some(&INVALID),
        Io::ConnectionReset => Some(&CONNECTION_RESET_BY_PEER),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static LOOKALIKE: Sentinel = Sentinel::new("connection reset by peer");

    #[test]
    fn test_identity() {
        assert!(CONNECTION_RESET_BY_PEER.is(&CONNECTION_RESET_BY_PEER));
        assert_eq!(CONNECTION_RESET_BY_PEER, CONNECTION_RESET_BY_PEER);
    }

    #[test]
    fn test_equal_message_is_not_equal_sentinel() {
        assert_eq!(LOOKALIKE.message(), CONNECTION_RESET_BY_PEER.message());
        assert!(!LOOKALIKE.is(&CONNECTION_RESET_BY_PEER));
        assert_ne!(LOOKALIKE, CONNECTION_RESET_BY_PEER);
    }

    #[test]
    fn test_for_io_kind() {
        use std::io::ErrorKind as Io;

        let cases = [
            (Io::NotFound, &NOT_EXIST),
            (Io::PermissionDenied, &PERMISSION),
            (Io::AlreadyExists, &EXIST),
            (Io::InvalidInput, &INVALID),
            (Io::ConnectionReset, &CONNECTION_RESET_BY_PEER),
        ];
        for (kind, expected) in cases {
            assert!(for_io_kind(kind).is_some_and(|s| s.is(expected)), "{kind:?}");
        }
        assert!(for_io_kind(Io::Interrupted).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(NOT_EXIST.to_string(), "file does not exist");
    }
}
