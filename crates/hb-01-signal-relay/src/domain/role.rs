//! Peer roles.
//!
//! The relay knows exactly two peer identities. Each one owns a single slot
//! in the [`ConnectionRegistry`](crate::relay::ConnectionRegistry).

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two fixed peer identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Consumes media and issues commands.
    Controller,
    /// Produces media (binary frames) and answers commands.
    Producer,
}

impl Role {
    /// All roles, in slot order.
    pub const ALL: [Role; 2] = [Role::Controller, Role::Producer];

    /// Parse a role from its wire identifier.
    ///
    /// `unity` and `helper` are the identifiers deployed clients announce
    /// themselves with and map onto the controller and producer slots.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "controller" | "unity" => Some(Role::Controller),
            "producer" | "helper" => Some(Role::Producer),
            _ => None,
        }
    }

    /// Canonical wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Controller => "controller",
            Role::Producer => "producer",
        }
    }

    /// The role on the other end of the relay.
    pub fn opposite(&self) -> Self {
        match self {
            Role::Controller => Role::Producer,
            Role::Producer => Role::Controller,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_wire() {
        assert_eq!(Role::from_wire("controller"), Some(Role::Controller));
        assert_eq!(Role::from_wire("producer"), Some(Role::Producer));
        assert_eq!(Role::from_wire("unity"), Some(Role::Controller));
        assert_eq!(Role::from_wire("helper"), Some(Role::Producer));
        assert_eq!(Role::from_wire("Controller"), None);
        assert_eq!(Role::from_wire("viewer"), None);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(Role::Controller.opposite(), Role::Producer);
        assert_eq!(Role::Producer.opposite(), Role::Controller);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Role::Producer).unwrap();
        assert_eq!(json, "\"producer\"");
    }
}
