//! Domain layer - catalog entries, configuration and errors.

pub mod config;
pub mod entry;
pub mod errors;

pub use config::CatalogConfig;
pub use entry::AppEntry;
pub use errors::{CatalogError, CatalogResult};
