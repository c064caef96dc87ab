//! WebSocket transport for the relay.
//!
//! - HTTP Upgrade on the configured path
//! - Text and binary frames routed by role
//! - Keep-alive pings, bounded per-peer outbound queues

pub mod handler;

pub use handler::ConnectionHandler;
