//! Chain traversal and matching
//!
//! A chain is the path from an outermost [`Error`] through its causes to the
//! root. Members can be errchain nodes, sentinels, or foreign errors; all of
//! them are seen through [`Link`], which exposes a kind (neutral for anything
//! that is not a kinded node) and the next cause.

use crate::error::Cause;
use crate::sentinel;
use crate::{Error, ErrorKind, Sentinel};
use std::borrow::Cow;
use std::error::Error as StdError;

/// A borrowed view of one member of a chain.
#[derive(Debug, Clone, Copy)]
pub enum Link<'a> {
    /// An errchain node, kinded or a text layer
    Node(&'a Error),
    /// A sentinel
    Sentinel(&'a Sentinel),
    /// Any other error
    Foreign(&'a (dyn StdError + 'static)),
}

impl<'a> Link<'a> {
    /// View any error as a link, recognising errchain types behind the
    /// trait object.
    pub fn from_dyn(err: &'a (dyn StdError + 'static)) -> Self {
        if let Some(node) = err.downcast_ref::<Error>() {
            Link::Node(node)
        } else if let Some(sentinel) = err.downcast_ref::<Sentinel>() {
            Link::Sentinel(sentinel)
        } else {
            Link::Foreign(err)
        }
    }

    /// Kind of this link; sentinels and foreign errors are neutral
    pub fn kind(&self) -> Option<ErrorKind> {
        match *self {
            Link::Node(err) => err.kind(),
            Link::Sentinel(_) | Link::Foreign(_) => None,
        }
    }

    /// The next link towards the root
    pub fn cause(&self) -> Option<Link<'a>> {
        match *self {
            Link::Node(err) => err.cause(),
            Link::Sentinel(_) => None,
            Link::Foreign(err) => err.source().map(Link::from_dyn),
        }
    }

    /// Whether this link is the given sentinel.
    ///
    /// Sentinels compare by identity. A foreign `std::io::Error` stands for
    /// the sentinel of its `io::ErrorKind` (`NotFound` is `NOT_EXIST`, ...).
    pub fn is(&self, target: &Sentinel) -> bool {
        match *self {
            Link::Sentinel(sentinel) => sentinel.is(target),
            Link::Foreign(err) => err
                .downcast_ref::<std::io::Error>()
                .and_then(|io| sentinel::for_io_kind(io.kind()))
                .is_some_and(|sentinel| sentinel.is(target)),
            Link::Node(_) => false,
        }
    }

    /// The errchain node behind this link, if it is one
    pub fn as_error(&self) -> Option<&'a Error> {
        match *self {
            Link::Node(err) => Some(err),
            _ => None,
        }
    }

    /// Text this link contributes to a chain description
    pub fn text(&self) -> Option<Cow<'a, str>> {
        let text = match *self {
            Link::Node(err) => Cow::Borrowed(err.own_text()?),
            Link::Sentinel(sentinel) => Cow::Borrowed(sentinel.message()),
            Link::Foreign(err) => Cow::Owned(err.to_string()),
        };
        (!text.is_empty()).then_some(text)
    }
}

/// Iterator over a chain, outermost first.
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<Link<'a>>,
}

impl<'a> Chain<'a> {
    pub(crate) fn new(start: Link<'a>) -> Self {
        Self { next: Some(start) }
    }

    /// Walk the chain of any error, e.g. the inside of an `anyhow::Error`.
    pub fn from_dyn(err: &'a (dyn StdError + 'static)) -> Self {
        Self::new(Link::from_dyn(err))
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = Link<'a>;

    fn next(&mut self) -> Option<Link<'a>> {
        let current = self.next.take()?;
        self.next = current.cause();
        Some(current)
    }
}

// =============================================================================
// Free-function API
// =============================================================================

/// Build a node from an optional kind, an optional cause and optional detail.
///
/// Passing no cause is how a caller deliberately drops one.
pub fn wrap(kind: Option<ErrorKind>, cause: Option<Cause>, detail: Option<&str>) -> Error {
    let detail = detail.unwrap_or_default();
    let err = match kind {
        Some(kind) => Error::new(kind, detail),
        None => Error::text(detail),
    };
    match cause {
        Some(cause) => err.set_source(cause),
        None => err,
    }
}

/// Wrap a cause in a neutral text layer.
pub fn wrap_text(detail: impl Into<String>, cause: impl Into<Cause>) -> Error {
    Error::text(detail).set_source(cause)
}

/// Render the chain as `"outer: middle: root"`. Never empty.
pub fn describe(err: &Error) -> String {
    err.describe()
}

/// Whether some node of the chain has the given kind.
pub fn matches_kind(err: &Error, kind: ErrorKind) -> bool {
    err.is_kind(kind)
}

/// Whether the chain contains exactly the given sentinel.
pub fn matches_sentinel(err: &Error, target: &Sentinel) -> bool {
    err.is_sentinel(target)
}

/// [`matches_kind`] for a chain that does not start at an errchain node.
pub fn matches_kind_dyn(err: &(dyn StdError + 'static), kind: ErrorKind) -> bool {
    Chain::from_dyn(err).any(|link| link.kind() == Some(kind))
}

/// [`matches_sentinel`] for a chain that does not start at an errchain node.
pub fn matches_sentinel_dyn(err: &(dyn StdError + 'static), target: &Sentinel) -> bool {
    Chain::from_dyn(err).any(|link| link.is(target))
}
