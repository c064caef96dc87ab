//! Domain layer - relay types with no transport dependencies.

pub mod config;
pub mod connection_id;
pub mod envelope;
pub mod error;
pub mod frame;
pub mod role;

pub use config::{ConfigError, RelayConfig};
pub use connection_id::ConnectionId;
pub use envelope::{classify, ControlEnvelope, InboundUnit};
pub use error::{DecodeFailure, RelayError, ServiceError};
pub use frame::Frame;
pub use role::Role;
