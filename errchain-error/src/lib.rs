//! # errchain-error
//!
//! Chained errors with two ways of asking "what went wrong underneath?".
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Structural tag of a node (e.g., Connection, UnexpectedResponse)
//! - **Sentinel**: A `static` error value for one low-level condition, compared by identity
//! - **Chain**: Each node owns its cause; matching walks from the outermost node to the root
//! - **ErrorStatus**: Decide how to handle it (Permanent, Temporary, Persistent)
//!
//! ## Usage
//!
//! Structured style, every layer has a kind:
//!
//! ```rust
//! use errchain_error::{Error, ErrorKind};
//!
//! let err = Error::unexpected_response(Error::connection(Error::connection_reset_by_peer()));
//!
//! assert!(err.is_kind(ErrorKind::ConnectionResetByPeer));
//! assert!(!err.is_kind(ErrorKind::TimedOut));
//! ```
//!
//! Sentinel style, only the leaf is distinguished:
//!
//! ```rust
//! use errchain_error::{describe, matches_sentinel, wrap_text, CONNECTION_RESET_BY_PEER};
//!
//! let e0 = wrap_text("Connection error", &CONNECTION_RESET_BY_PEER);
//! let e1 = wrap_text("Unexpected response", e0);
//!
//! assert!(matches_sentinel(&e1, &CONNECTION_RESET_BY_PEER));
//! assert_eq!(
//!     describe(&e1),
//!     "Unexpected response: Connection error: connection reset by peer"
//! );
//! ```
//!
//! ## Principles
//!
//! - Lower layers build the most specific node they can; callers wrap to add context
//! - Dropping a cause is explicit: pass no cause to [`wrap`]
//! - Sentinels never match by message, only by identity

mod chain;
mod error;
mod kind;
mod sentinel;
mod status;

pub use chain::{
    describe, matches_kind, matches_kind_dyn, matches_sentinel, matches_sentinel_dyn, wrap,
    wrap_text, Chain, Link,
};
pub use error::{Cause, Error};
pub use kind::ErrorKind;
pub use sentinel::{
    Sentinel, CONNECTION_RESET_BY_PEER, EXIST, INVALID, NOT_EXIST, PERMISSION,
};
pub use status::ErrorStatus;

/// Result type alias using errchain Error
pub type Result<T> = std::result::Result<T, Error>;
