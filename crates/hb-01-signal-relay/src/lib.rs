#![allow(missing_docs)]

//! HB-01 Signal Relay - role-aware WebSocket relay between one controller and
//! one producer.
//!
//! # Architecture
//!
//! ```text
//!   controller ──┐                                  ┌── producer
//!                │  ws upgrade (config path)        │
//!                ▼                                  ▼
//!        ┌──────────────────────────────────────────────────┐
//!        │  ConnectionHandler (one per socket)              │
//!        │    reader: classify → Router::dispatch           │
//!        │    writer: outbound queue → socket, pings        │
//!        ├──────────────────────────────────────────────────┤
//!        │  ConnectionRegistry   { controller, producer }   │
//!        └──────────────────────────────────────────────────┘
//! ```
//!
//! # Routing
//!
//! - A JSON object frame is a control envelope. `role` claims a slot,
//!   `to` forwards the raw frame to that slot's occupant.
//! - Anything else is opaque media and always goes to the controller.
//! - Delivery is best effort: a missing or slow destination drops the frame.
//!
//! # Usage
//!
//! ```ignore
//! use hb_01_signal_relay::{RelayConfig, RelayService};
//!
//! let service = RelayService::new(RelayConfig::default())?;
//! let listener = service.bind().await?;
//! service.serve(listener, service.router()).await?;
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod middleware;
pub mod relay;
pub mod service;
pub mod ws;

// Re-exports for public API
pub use domain::config::RelayConfig;
pub use domain::{
    classify, ConfigError, ConnectionId, ControlEnvelope, DecodeFailure, Frame, InboundUnit,
    RelayError, Role, ServiceError,
};
pub use middleware::RelayMetrics;
pub use relay::{ConnectionRegistry, DispatchReport, PeerHandle, Router};
pub use service::{RelayService, ShutdownHandle};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
