#![allow(missing_docs)]

//! HB-02 Host Catalog - local applications for the controller.
//!
//! Lists `.app` bundles from configured directories, serves their
//! pre-rendered icons and launches them through an external command. The
//! routes are merged into the relay's HTTP listener.
//!
//! # Usage
//!
//! ```ignore
//! use hb_02_host_catalog::{catalog_router, CatalogConfig, DirectoryCatalog};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(DirectoryCatalog::new(CatalogConfig::default()));
//! let routes = catalog_router(catalog);
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{catalog_router, DirectoryCatalog, CATALOG_PATHS};
pub use domain::{AppEntry, CatalogConfig, CatalogError, CatalogResult};
pub use ports::HostCatalog;
