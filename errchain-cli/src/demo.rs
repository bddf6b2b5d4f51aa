//! The chains the CLI builds and inspects

use errchain_error::{
    wrap_text, Error, ErrorKind, Result, Sentinel, CONNECTION_RESET_BY_PEER, EXIST, INVALID,
    NOT_EXIST, PERMISSION,
};

/// Same message as [`CONNECTION_RESET_BY_PEER`], different identity.
pub static LOOKALIKE_RESET: Sentinel = Sentinel::new("connection reset by peer");

/// Kinds probed by the structured demo
pub const STRUCTURED_PROBES: [ErrorKind; 4] = [
    ErrorKind::UnexpectedResponse,
    ErrorKind::Connection,
    ErrorKind::ConnectionResetByPeer,
    ErrorKind::TimedOut,
];

/// Sentinels probed by the sentinel demo
pub fn sentinel_probes() -> [(&'static str, &'static Sentinel); 3] {
    [
        ("CONNECTION_RESET_BY_PEER", &CONNECTION_RESET_BY_PEER),
        ("LOOKALIKE_RESET", &LOOKALIKE_RESET),
        ("NOT_EXIST", &NOT_EXIST),
    ]
}

/// OS-condition sentinels probed by the io demo
pub fn os_sentinel_probes() -> [(&'static str, &'static Sentinel); 5] {
    [
        ("CONNECTION_RESET_BY_PEER", &CONNECTION_RESET_BY_PEER),
        ("NOT_EXIST", &NOT_EXIST),
        ("PERMISSION", &PERMISSION),
        ("EXIST", &EXIST),
        ("INVALID", &INVALID),
    ]
}

fn read_frame() -> Result<Vec<u8>> {
    Err(Error::connection_reset_by_peer().with_operation("socket::read"))
}

fn dial(host: &str) -> Result<Vec<u8>> {
    read_frame().map_err(|err| {
        Error::connection(err)
            .with_operation("client::dial")
            .with_context("host", host)
    })
}

fn fetch(host: &str) -> Result<Vec<u8>> {
    dial(host).map_err(|err| Error::unexpected_response(err).with_operation("client::fetch"))
}

/// Every layer is a kinded node:
/// `UnexpectedResponse <- Connection <- ConnectionResetByPeer`.
pub fn structured_chain(host: &str) -> Error {
    match fetch(host) {
        Ok(_) => Error::unexpected("fetch returned a frame"),
        Err(err) => err,
    }
}

fn read_frame_plain() -> Result<Vec<u8>> {
    Err(wrap_text("Connection error", &CONNECTION_RESET_BY_PEER))
}

/// Only the leaf is distinguished:
/// `"Unexpected response" <- "Connection error" <- CONNECTION_RESET_BY_PEER`.
pub fn sentinel_chain() -> Error {
    match read_frame_plain() {
        Ok(_) => Error::unexpected("read returned a frame"),
        Err(err) => wrap_text("Unexpected response", err),
    }
}

/// An OS-level reset mapped onto a kind, then wrapped.
pub fn io_chain(peer: &str) -> Error {
    let os_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "os error 104");
    let err = Error::from(os_err).with_context("peer", peer);
    Error::unexpected_response(err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use errchain_error::{matches_kind, matches_sentinel};

    #[test]
    fn test_structured_chain() {
        let err = structured_chain("api.internal");

        assert_eq!(err.depth(), 3);
        assert_eq!(err.operation(), "client::fetch");
        assert!(matches_kind(&err, ErrorKind::UnexpectedResponse));
        assert!(matches_kind(&err, ErrorKind::Connection));
        assert!(matches_kind(&err, ErrorKind::ConnectionResetByPeer));
        assert!(!matches_kind(&err, ErrorKind::TimedOut));

        let conn = err.find_kind(ErrorKind::Connection);
        assert_eq!(
            conn.map(|e| e.context().to_vec()),
            Some(vec![("host", "api.internal".to_string())])
        );
    }

    #[test]
    fn test_sentinel_chain() {
        let err = sentinel_chain();

        assert!(matches_sentinel(&err, &CONNECTION_RESET_BY_PEER));
        assert!(!matches_sentinel(&err, &LOOKALIKE_RESET));
        assert_eq!(
            err.describe(),
            "Unexpected response: Connection error: connection reset by peer"
        );
    }

    #[test]
    fn test_io_chain() {
        let err = io_chain("10.0.0.7:443");

        assert!(matches_kind(&err, ErrorKind::ConnectionResetByPeer));
        assert!(matches_sentinel(&err, &CONNECTION_RESET_BY_PEER));

        let matched: Vec<_> = os_sentinel_probes()
            .into_iter()
            .filter(|(_, sentinel)| matches_sentinel(&err, sentinel))
            .map(|(name, _)| name)
            .collect();
        assert_eq!(matched, vec!["CONNECTION_RESET_BY_PEER"]);
        assert_eq!(
            err.describe(),
            "Unexpected response: Connection reset by peer: os error 104"
        );
    }
}
