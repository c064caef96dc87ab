//! Connection registry: one slot per role.
//!
//! The registry is the only shared mutable state in the relay. All access
//! goes through one mutex and no I/O happens while it is held: callers take
//! a [`PeerHandle`] clone out and send after the guard is dropped.

use crate::domain::{ConnectionId, Role};
use crate::relay::peer::PeerHandle;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Default)]
struct Slots {
    controller: Option<PeerHandle>,
    producer: Option<PeerHandle>,
}

impl Slots {
    fn slot_mut(&mut self, role: Role) -> &mut Option<PeerHandle> {
        match role {
            Role::Controller => &mut self.controller,
            Role::Producer => &mut self.producer,
        }
    }

    fn slot(&self, role: Role) -> &Option<PeerHandle> {
        match role {
            Role::Controller => &self.controller,
            Role::Producer => &self.producer,
        }
    }
}

/// Occupancy of one slot, for the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub role: Role,
    pub connection_id: Option<ConnectionId>,
    pub open: bool,
}

/// Role → connection bindings
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    slots: Mutex<Slots>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handle` to `role`.
    ///
    /// Returns the superseded occupant, if any, and closes it after the lock
    /// is released. Re-announcing the same role is a no-op; announcing a
    /// different role moves the connection out of its previous slot. A
    /// handle that is already closed is ignored.
    pub fn register(&self, role: Role, handle: PeerHandle) -> Option<PeerHandle> {
        let id = handle.id();
        if !handle.is_open() {
            debug!(role = %role, connection_id = %id, "Ignoring announcement from closed connection");
            return None;
        }

        let superseded = {
            let mut slots = self.slots.lock();

            let other = slots.slot_mut(role.opposite());
            if other.as_ref().is_some_and(|h| h.id() == id) {
                *other = None;
                debug!(connection_id = %id, from = %role.opposite(), to = %role, "Connection changed role");
            }

            slots
                .slot_mut(role)
                .replace(handle)
                .filter(|previous| previous.id() != id)
        };

        if let Some(previous) = &superseded {
            info!(
                role = %role,
                connection_id = %id,
                superseded = %previous.id(),
                "Slot superseded, closing previous occupant"
            );
            previous.close();
        } else {
            info!(role = %role, connection_id = %id, "Registered");
        }

        superseded
    }

    /// Clear whichever slot holds `id`. No-op if it holds none.
    pub fn unregister(&self, id: ConnectionId) -> Option<Role> {
        let mut slots = self.slots.lock();
        for role in Role::ALL {
            let slot = slots.slot_mut(role);
            if slot.as_ref().is_some_and(|h| h.id() == id) {
                *slot = None;
                debug!(role = %role, connection_id = %id, "Unregistered");
                return Some(role);
            }
        }
        None
    }

    /// Current open occupant of `role`.
    pub fn lookup(&self, role: Role) -> Option<PeerHandle> {
        self.slots
            .lock()
            .slot(role)
            .as_ref()
            .filter(|h| h.is_open())
            .cloned()
    }

    pub fn snapshot(&self) -> Vec<SlotStatus> {
        let slots = self.slots.lock();
        Role::ALL
            .into_iter()
            .map(|role| {
                let occupant = slots.slot(role).as_ref();
                SlotStatus {
                    role,
                    connection_id: occupant.map(|h| h.id()),
                    open: occupant.is_some_and(|h| h.is_open()),
                }
            })
            .collect()
    }

    /// Close and clear every slot. Used on shutdown.
    pub fn close_all(&self) -> usize {
        let evicted: Vec<PeerHandle> = {
            let mut slots = self.slots.lock();
            Role::ALL
                .into_iter()
                .filter_map(|role| slots.slot_mut(role).take())
                .collect()
        };

        for handle in &evicted {
            handle.close();
        }
        evicted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::peer::PeerMailbox;
    use proptest::prelude::*;

    fn peer() -> (PeerHandle, PeerMailbox) {
        PeerHandle::new(ConnectionId::new(), 4)
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ConnectionRegistry::new();
        let (a, _ma) = peer();

        assert!(registry.register(Role::Producer, a.clone()).is_none());

        assert_eq!(registry.lookup(Role::Producer), Some(a.clone()));
        assert_eq!(registry.lookup(Role::Controller), None);
    }

    #[test]
    fn test_newer_registration_supersedes_and_closes() {
        let registry = ConnectionRegistry::new();
        let (a, _ma) = peer();
        let (c, _mc) = peer();

        registry.register(Role::Producer, a.clone());
        let superseded = registry.register(Role::Producer, c.clone());

        assert_eq!(superseded, Some(a.clone()));
        assert!(!a.is_open());
        assert_eq!(registry.lookup(Role::Producer), Some(c));
    }

    #[test]
    fn test_reannounce_same_role_keeps_connection_open() {
        let registry = ConnectionRegistry::new();
        let (a, _ma) = peer();

        registry.register(Role::Controller, a.clone());
        assert!(registry.register(Role::Controller, a.clone()).is_none());
        assert!(a.is_open());
        assert_eq!(registry.lookup(Role::Controller), Some(a));
    }

    #[test]
    fn test_role_change_moves_connection() {
        let registry = ConnectionRegistry::new();
        let (a, _ma) = peer();

        registry.register(Role::Producer, a.clone());
        registry.register(Role::Controller, a.clone());

        assert_eq!(registry.lookup(Role::Producer), None);
        assert_eq!(registry.lookup(Role::Controller), Some(a));
    }

    #[test]
    fn test_unregister_by_identity() {
        let registry = ConnectionRegistry::new();
        let (a, _ma) = peer();
        let (b, _mb) = peer();

        registry.register(Role::Producer, a.clone());

        assert_eq!(registry.unregister(b.id()), None);
        assert_eq!(registry.lookup(Role::Producer), Some(a.clone()));

        assert_eq!(registry.unregister(a.id()), Some(Role::Producer));
        assert_eq!(registry.lookup(Role::Producer), None);
    }

    #[test]
    fn test_stale_unregister_does_not_evict_successor() {
        let registry = ConnectionRegistry::new();
        let (a, _ma) = peer();
        let (c, _mc) = peer();

        registry.register(Role::Producer, a.clone());
        registry.register(Role::Producer, c.clone());

        // A's task notices it was superseded and cleans up.
        assert_eq!(registry.unregister(a.id()), None);
        assert_eq!(registry.lookup(Role::Producer), Some(c));
    }

    #[test]
    fn test_superseded_connection_cannot_reclaim_slot() {
        let registry = ConnectionRegistry::new();
        let (a, _ma) = peer();
        let (c, _mc) = peer();

        registry.register(Role::Producer, a.clone());
        registry.register(Role::Producer, c.clone());
        assert!(!a.is_open());

        // A buffered announcement from A arrives after it was closed.
        assert!(registry.register(Role::Producer, a.clone()).is_none());
        assert!(registry.register(Role::Controller, a.clone()).is_none());

        assert!(c.is_open());
        assert_eq!(registry.lookup(Role::Producer), Some(c));
        assert!(registry.snapshot()[0].connection_id.is_none());
    }

    #[test]
    fn test_closed_occupant_is_not_returned() {
        let registry = ConnectionRegistry::new();
        let (a, mailbox) = peer();

        registry.register(Role::Controller, a.clone());
        drop(mailbox);

        assert_eq!(registry.lookup(Role::Controller), None);
        let status = registry.snapshot();
        assert_eq!(status[0].connection_id, Some(a.id()));
        assert!(!status[0].open);
    }

    #[test]
    fn test_close_all() {
        let registry = ConnectionRegistry::new();
        let (a, _ma) = peer();
        let (b, _mb) = peer();
        registry.register(Role::Producer, a.clone());
        registry.register(Role::Controller, b.clone());

        assert_eq!(registry.close_all(), 2);

        assert!(!a.is_open());
        assert!(!b.is_open());
        assert!(registry.snapshot().iter().all(|s| s.connection_id.is_none()));
    }

    proptest! {
        #[test]
        fn prop_latest_announcement_wins(
            announcements in proptest::collection::vec((0usize..4, any::<bool>()), 1..40)
        ) {
            let registry = ConnectionRegistry::new();
            let peers: Vec<_> = (0..4).map(|_| peer()).collect();
            let mut expected: [Option<usize>; 2] = [None, None];

            for (who, as_controller) in announcements {
                let role = if as_controller { Role::Controller } else { Role::Producer };
                let (idx, other) = if as_controller { (0, 1) } else { (1, 0) };

                // Only re-register peers that are still open; superseded ones
                // have been told to close.
                if !peers[who].0.is_open() {
                    continue;
                }
                registry.register(role, peers[who].0.clone());

                if expected[other] == Some(who) {
                    expected[other] = None;
                }
                if let Some(prev) = expected[idx] {
                    if prev != who {
                        prop_assert!(!peers[prev].0.is_open());
                    }
                }
                expected[idx] = Some(who);

                let snapshot = registry.snapshot();
                for (slot, want) in snapshot.iter().zip(expected.iter()) {
                    prop_assert_eq!(slot.connection_id, want.map(|i| peers[i].0.id()));
                }
                // A connection never occupies both slots.
                prop_assert!(snapshot[0].connection_id.is_none()
                    || snapshot[0].connection_id != snapshot[1].connection_id);
            }
        }
    }
}
