//! Adapters - filesystem catalog and its HTTP routes.

pub mod directory;
pub mod http;

pub use directory::DirectoryCatalog;
pub use http::{catalog_router, CATALOG_PATHS};
