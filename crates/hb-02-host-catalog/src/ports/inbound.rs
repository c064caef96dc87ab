//! Inbound port - what the HTTP surface asks of the host.

use crate::domain::{AppEntry, CatalogResult};
use async_trait::async_trait;
use std::path::Path;

/// Local application catalog.
#[async_trait]
pub trait HostCatalog: Send + Sync {
    /// Applications found on the host, filtered by the allow-list.
    async fn list_apps(&self) -> CatalogResult<Vec<AppEntry>>;

    /// PNG bytes of the icon for `name`.
    async fn icon(&self, name: &str) -> CatalogResult<Vec<u8>>;

    /// Open the application at `path`. Resolves once the launcher exits.
    async fn launch(&self, path: &Path) -> CatalogResult<()>;
}
