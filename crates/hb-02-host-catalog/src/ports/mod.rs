//! Ports for the host catalog.

pub mod inbound;

pub use inbound::HostCatalog;
