//! Relay error types.
//!
//! None of these are fatal to the server. Routing errors are recorded and
//! dropped; they are never reported back to the sending peer.

use crate::domain::role::Role;
use std::time::Duration;

/// Why a frame could not be decoded as a control envelope.
///
/// Not propagated: the frame is classified as opaque instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeFailure {
    #[error("malformed JSON: {0}")]
    Malformed(String),

    #[error("top-level JSON {0} is not an object")]
    NotAnObject(&'static str),
}

/// Forwarding failures. The frame is dropped in every case.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    /// Destination slot is empty or its occupant is closed
    #[error("no open {0} connection")]
    RouteMiss(Role),

    /// Destination did not accept the frame in time
    #[error("send to {role} timed out after {timeout:?}")]
    SendTimeout { role: Role, timeout: Duration },

    /// Destination connection went away between lookup and send
    #[error("{0} connection closed during send")]
    PeerGone(Role),
}

impl RelayError {
    /// Role the failed frame was addressed to
    pub fn role(&self) -> Role {
        match self {
            RelayError::RouteMiss(role) | RelayError::PeerGone(role) => *role,
            RelayError::SendTimeout { role, .. } => *role,
        }
    }
}

/// Service-level errors (startup and serving, not routing).
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] crate::domain::config::ConfigError),

    /// Server socket bind error
    #[error("server bind error on {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Server loop terminated with an I/O error
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
