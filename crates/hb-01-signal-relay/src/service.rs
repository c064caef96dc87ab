//! Relay service - owns the registry and serves the HTTP surface.
//!
//! One listener carries the WebSocket upgrade path plus the health, metrics
//! and status endpoints. Other route sets (the host catalog) are merged in by
//! [`RelayService::app`] so they share the same middleware.

use crate::domain::config::RelayConfig;
use crate::domain::error::ServiceError;
use crate::middleware::{create_cors_layer, RelayMetrics, TracingLayer};
use crate::relay::{ConnectionRegistry, Router as RelayRouter};
use crate::ws::handler::{signalled, ConnectionHandler};
use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower::ServiceBuilder;
use tracing::{info, warn};

/// Relay service state
pub struct RelayService {
    config: RelayConfig,
    registry: Arc<ConnectionRegistry>,
    router: Arc<RelayRouter>,
    metrics: Arc<RelayMetrics>,
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl RelayService {
    /// Create a new relay service with an empty registry.
    pub fn new(config: RelayConfig) -> Result<Self, ServiceError> {
        config.validate()?;

        let registry = Arc::new(ConnectionRegistry::new());
        let metrics = Arc::new(RelayMetrics::new());
        let router = Arc::new(RelayRouter::new(
            Arc::clone(&registry),
            Arc::clone(&metrics),
            config.websocket.send_timeout,
        ));
        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            config,
            registry,
            router,
            metrics,
            shutdown_tx: Arc::new(shutdown_tx),
        })
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn registry(&self) -> Arc<ConnectionRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn metrics(&self) -> Arc<RelayMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Handle that stops the service from another task.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            shutdown_tx: Arc::clone(&self.shutdown_tx),
            registry: Arc::clone(&self.registry),
        }
    }

    /// Relay routes only.
    pub fn router(&self) -> Router {
        self.app(Router::new())
    }

    /// Relay routes merged with `extra`, wrapped in the HTTP middleware.
    pub fn app(&self, extra: Router) -> Router {
        let state = RelayState {
            router: Arc::clone(&self.router),
            metrics: Arc::clone(&self.metrics),
            registry: Arc::clone(&self.registry),
            config: self.config.clone(),
            shutdown_rx: self.shutdown_tx.subscribe(),
        };

        let mut relay = Router::new().route(&self.config.websocket.path, get(ws_upgrade));
        if self.config.admin.enabled {
            relay = relay
                .route("/health", get(health_check))
                .route("/metrics", get(metrics_report))
                .route("/status", get(slot_status));
        }

        let middleware = ServiceBuilder::new()
            .layer(create_cors_layer(&self.config.cors))
            .layer(TracingLayer::new());

        relay.with_state(state).merge(extra).layer(middleware)
    }

    /// Bind the configured listen address.
    pub async fn bind(&self) -> Result<TcpListener, ServiceError> {
        let addr = self.config.server_addr();
        TcpListener::bind(addr)
            .await
            .map_err(|source| ServiceError::Bind { addr, source })
    }

    /// Serve `app` on `listener` until shutdown is triggered.
    pub async fn serve(&self, listener: TcpListener, app: Router) -> Result<(), ServiceError> {
        let local_addr = listener.local_addr().map_err(ServiceError::Serve)?;
        info!(addr = %local_addr, ws_path = %self.config.websocket.path, "Relay listening");

        let mut shutdown_rx = self.shutdown_tx.subscribe();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { signalled(&mut shutdown_rx).await })
            .await
            .map_err(ServiceError::Serve)?;

        info!("Relay stopped");
        Ok(())
    }
}

/// Cloneable trigger for [`RelayService`] shutdown.
#[derive(Clone)]
pub struct ShutdownHandle {
    shutdown_tx: Arc<watch::Sender<bool>>,
    registry: Arc<ConnectionRegistry>,
}

impl ShutdownHandle {
    /// Stop accepting, close every connection and clear the registry.
    pub fn shutdown(&self) {
        info!("Relay shutting down");
        self.shutdown_tx.send_replace(true);
        let closed = self.registry.close_all();
        if closed > 0 {
            info!(closed, "Closed registered connections");
        }
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown_tx.borrow()
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct RelayState {
    router: Arc<RelayRouter>,
    metrics: Arc<RelayMetrics>,
    registry: Arc<ConnectionRegistry>,
    config: RelayConfig,
    shutdown_rx: watch::Receiver<bool>,
}

async fn ws_upgrade(State(state): State<RelayState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let ws_config = state.config.websocket.clone();
    let max_size = ws_config.max_message_size;

    ws.max_message_size(max_size)
        .max_frame_size(max_size)
        .on_failed_upgrade(|e| warn!(error = %e, "WebSocket upgrade failed"))
        .on_upgrade(move |socket| async move {
            let handler = ConnectionHandler::new(
                state.router,
                state.metrics,
                ws_config,
                state.shutdown_rx,
            );
            handler.handle(socket).await;
        })
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn metrics_report(State(state): State<RelayState>) -> impl IntoResponse {
    Json(state.metrics.to_json())
}

async fn slot_status(State(state): State<RelayState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "slots": state.registry.snapshot(),
        "connections_active": state.metrics.connections_active.load(Ordering::Relaxed),
    }))
}
