//! # HostBridge
//!
//! Serves the controller/producer signal relay and the host application
//! catalog on a single port.
//!
//! ## Startup Sequence
//!
//! 1. Install logging (`HB_LOG_LEVEL`, `HB_JSON_LOGS`)
//! 2. Load configuration (defaults, `HB_CONFIG` file, environment)
//! 3. Bind the listener
//! 4. Serve until Ctrl+C, then close every relay connection

use anyhow::{Context, Result};
use bridge_runtime::{load_config, BridgeRuntime};
use hb_telemetry::{init_telemetry, TelemetryConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize logging")?;

    let config = load_config().context("Failed to load configuration")?;
    let runtime = BridgeRuntime::new(config).context("Failed to create runtime")?;
    let listener = runtime
        .relay()
        .bind()
        .await
        .context("Failed to bind listener")?;

    let shutdown = runtime.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Ctrl+C received"),
            Err(e) => {
                error!(error = %e, "Failed to listen for Ctrl+C");
                return;
            }
        }
        shutdown.shutdown();
    });

    info!("HostBridge is running. Press Ctrl+C to stop.");
    runtime.serve(listener).await.context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}
