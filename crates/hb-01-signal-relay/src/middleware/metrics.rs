//! Relay counters.
//!
//! Plain atomics, served as JSON on `/metrics`.

use crate::domain::RelayError;
use std::sync::atomic::{AtomicU64, Ordering};

/// Relay metrics
#[derive(Debug, Default)]
pub struct RelayMetrics {
    // Connection counters
    pub connections_active: AtomicU64,
    pub connections_total: AtomicU64,

    // Registry counters
    pub registrations: AtomicU64,
    pub supersessions: AtomicU64,

    // Forwarding counters
    pub control_forwarded: AtomicU64,
    pub opaque_forwarded: AtomicU64,
    pub bytes_forwarded: AtomicU64,

    // Drop counters by cause
    pub dropped_route_miss: AtomicU64,
    pub dropped_send_timeout: AtomicU64,
    pub dropped_peer_gone: AtomicU64,
}

impl RelayMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an upgraded connection
    pub fn record_connect(&self) {
        self.connections_active.fetch_add(1, Ordering::Relaxed);
        self.connections_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a closed connection
    pub fn record_disconnect(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn record_registration(&self, superseded: bool) {
        self.registrations.fetch_add(1, Ordering::Relaxed);
        if superseded {
            self.supersessions.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a forwarded frame
    pub fn record_forward(&self, control: bool, bytes: usize) {
        if control {
            self.control_forwarded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.opaque_forwarded.fetch_add(1, Ordering::Relaxed);
        }
        self.bytes_forwarded.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Record a dropped frame
    pub fn record_drop(&self, error: &RelayError) {
        let counter = match error {
            RelayError::RouteMiss(_) => &self.dropped_route_miss,
            RelayError::SendTimeout { .. } => &self.dropped_send_timeout,
            RelayError::PeerGone(_) => &self.dropped_peer_gone,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Total dropped frames across causes
    pub fn dropped_total(&self) -> u64 {
        self.dropped_route_miss.load(Ordering::Relaxed)
            + self.dropped_send_timeout.load(Ordering::Relaxed)
            + self.dropped_peer_gone.load(Ordering::Relaxed)
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "connections": {
                "active": self.connections_active.load(Ordering::Relaxed),
                "total": self.connections_total.load(Ordering::Relaxed),
            },
            "registry": {
                "registrations": self.registrations.load(Ordering::Relaxed),
                "supersessions": self.supersessions.load(Ordering::Relaxed),
            },
            "forwarded": {
                "control": self.control_forwarded.load(Ordering::Relaxed),
                "opaque": self.opaque_forwarded.load(Ordering::Relaxed),
                "bytes": self.bytes_forwarded.load(Ordering::Relaxed),
            },
            "dropped": {
                "route_miss": self.dropped_route_miss.load(Ordering::Relaxed),
                "send_timeout": self.dropped_send_timeout.load(Ordering::Relaxed),
                "peer_gone": self.dropped_peer_gone.load(Ordering::Relaxed),
            },
        })
    }
}
