//! Bridge runtime - relay and catalog on one listener.

use crate::config::BridgeConfig;
use axum::Router;
use hb_01_signal_relay::{ConfigError, RelayConfig, RelayService, ServiceError, ShutdownHandle};
use hb_02_host_catalog::{catalog_router, DirectoryCatalog, HostCatalog, CATALOG_PATHS};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// The running bridge.
pub struct BridgeRuntime {
    relay: RelayService,
    catalog: Arc<dyn HostCatalog>,
}

impl BridgeRuntime {
    /// Create the runtime with the filesystem catalog.
    pub fn new(config: BridgeConfig) -> Result<Self, ServiceError> {
        let catalog = Arc::new(DirectoryCatalog::new(config.catalog));
        Self::with_catalog(config.relay, catalog)
    }

    /// Create the runtime around any catalog implementation.
    pub fn with_catalog(
        relay: RelayConfig,
        catalog: Arc<dyn HostCatalog>,
    ) -> Result<Self, ServiceError> {
        if CATALOG_PATHS.contains(&relay.websocket.path.as_str()) {
            return Err(ConfigError::InvalidPath(relay.websocket.path).into());
        }
        Ok(Self {
            relay: RelayService::new(relay)?,
            catalog,
        })
    }

    pub fn relay(&self) -> &RelayService {
        &self.relay
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.relay.shutdown_handle()
    }

    /// Relay, admin and catalog routes behind the relay middleware.
    pub fn app(&self) -> Router {
        self.relay.app(catalog_router(Arc::clone(&self.catalog)))
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn run(&self) -> Result<(), ServiceError> {
        let listener = self.relay.bind().await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until shutdown.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServiceError> {
        info!(
            version = hb_01_signal_relay::VERSION,
            ws_path = %self.relay.config().websocket.path,
            "Starting HostBridge"
        );
        self.relay.serve(listener, self.app()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_path_rejected_for_ws() {
        let mut config = BridgeConfig::default();
        config.relay.websocket.path = "/ping".to_string();
        assert!(matches!(
            BridgeRuntime::new(config),
            Err(ServiceError::Config(ConfigError::InvalidPath(_)))
        ));
    }
}
