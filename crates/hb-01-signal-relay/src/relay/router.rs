//! Role-aware routing.
//!
//! Routing rules:
//! - `role` in a control envelope registers the sender in that slot
//! - `to` in a control envelope forwards the raw frame to that slot
//! - opaque frames always go to the controller
//!
//! Delivery is best effort and at most once. Nothing is reported back to
//! the sender.

use crate::domain::{ControlEnvelope, Frame, InboundUnit, RelayError, Role};
use crate::middleware::RelayMetrics;
use crate::relay::peer::PeerHandle;
use crate::relay::registry::ConnectionRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Fixed destination of opaque (media) frames
pub const OPAQUE_DESTINATION: Role = Role::Controller;

/// Outcome of forwarding one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Forwarded(Role),
    Dropped(RelayError),
}

/// What the router did with one inbound unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Role the sender was registered under
    pub registered: Option<Role>,
    /// Forwarding outcome, `None` when the unit had no destination
    pub delivery: Option<Delivery>,
}

/// Routes classified units between the two slots
pub struct Router {
    registry: Arc<ConnectionRegistry>,
    metrics: Arc<RelayMetrics>,
    send_timeout: Duration,
}

impl Router {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        metrics: Arc<RelayMetrics>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            metrics,
            send_timeout,
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Handle one unit received from `sender`.
    pub async fn dispatch(&self, sender: &PeerHandle, unit: InboundUnit) -> DispatchReport {
        match unit {
            InboundUnit::Control(envelope) => self.dispatch_control(sender, envelope).await,
            InboundUnit::Opaque(frame) => DispatchReport {
                registered: None,
                delivery: Some(self.forward(sender, OPAQUE_DESTINATION, frame, false).await),
            },
        }
    }

    async fn dispatch_control(
        &self,
        sender: &PeerHandle,
        envelope: ControlEnvelope,
    ) -> DispatchReport {
        let mut report = DispatchReport::default();

        if let Some(role) = envelope.role {
            let superseded = self.registry.register(role, sender.clone());
            self.metrics.record_registration(superseded.is_some());
            report.registered = Some(role);
        }

        if let Some(to) = envelope.to {
            let frame = envelope.into_raw();
            report.delivery = Some(self.forward(sender, to, frame, true).await);
        }

        report
    }

    async fn forward(&self, sender: &PeerHandle, to: Role, frame: Frame, control: bool) -> Delivery {
        let bytes = frame.len();

        // Lookup holds the registry lock only for the clone.
        let result = match self.registry.lookup(to) {
            Some(destination) => destination.send(frame, to, self.send_timeout).await,
            None => Err(RelayError::RouteMiss(to)),
        };

        match result {
            Ok(()) => {
                self.metrics.record_forward(control, bytes);
                Delivery::Forwarded(to)
            }
            Err(error) => {
                debug!(
                    connection_id = %sender.id(),
                    to = %to,
                    bytes = bytes,
                    error = %error,
                    "Dropped frame"
                );
                self.metrics.record_drop(&error);
                Delivery::Dropped(error)
            }
        }
    }
}
