//! Relay core: registry, router and connection state.

pub mod lifecycle;
pub mod peer;
pub mod registry;
pub mod router;

pub use lifecycle::ConnectionState;
pub use peer::{PeerHandle, PeerMailbox};
pub use registry::{ConnectionRegistry, SlotStatus};
pub use router::{Delivery, DispatchReport, Router, OPAQUE_DESTINATION};
