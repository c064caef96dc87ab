//! Per-connection state machine.
//!
//! ```text
//! Open ──role──→ Registered(role) ──role──→ Registered(role')
//!   │                   │
//!   └──── close ────────┴──────────→ Closed
//! ```
//!
//! A connection that never announces a role stays `Open` until it closes;
//! it may still send opaque frames.

use crate::domain::Role;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "role", rename_all = "snake_case")]
pub enum ConnectionState {
    Open,
    Registered(Role),
    Closed,
}

impl ConnectionState {
    /// Apply a role announcement. Ignored once closed.
    pub fn on_registered(self, role: Role) -> Self {
        match self {
            ConnectionState::Closed => ConnectionState::Closed,
            _ => ConnectionState::Registered(role),
        }
    }

    pub fn on_closed(self) -> Self {
        ConnectionState::Closed
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            ConnectionState::Registered(role) => Some(*role),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ConnectionState::Closed)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Open => f.write_str("open"),
            ConnectionState::Registered(role) => write!(f, "registered-as-{}", role),
            ConnectionState::Closed => f.write_str("closed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let state = ConnectionState::Open;
        assert_eq!(state.role(), None);

        let state = state.on_registered(Role::Producer);
        assert_eq!(state, ConnectionState::Registered(Role::Producer));

        let state = state.on_registered(Role::Controller);
        assert_eq!(state.role(), Some(Role::Controller));

        let state = state.on_closed();
        assert!(state.is_closed());
        assert_eq!(state.on_registered(Role::Producer), ConnectionState::Closed);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ConnectionState::Registered(Role::Controller).to_string(),
            "registered-as-controller"
        );
    }
}
