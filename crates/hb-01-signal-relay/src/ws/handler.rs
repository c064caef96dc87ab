//! WebSocket connection handler.
//!
//! One handler runs per upgraded socket. The socket is split:
//! - the reader loop (this task) classifies inbound frames and dispatches
//!   them in receive order;
//! - a writer task drains the connection's outbound queue into the socket
//!   and sends keep-alive pings.
//!
//! The reader stops on transport close or error, when the relay closes the
//! connection (slot superseded), or on server shutdown. Either way the
//! connection is unregistered before the handler returns.

use crate::domain::config::WebSocketConfig;
use crate::domain::{classify, ConnectionId, Frame};
use crate::middleware::RelayMetrics;
use crate::relay::{ConnectionState, PeerHandle, PeerMailbox, Router};
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

/// Why the reader loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseReason {
    PeerClosed,
    TransportError,
    Superseded,
    Shutdown,
}

/// Per-connection lifecycle manager
pub struct ConnectionHandler {
    router: Arc<Router>,
    metrics: Arc<RelayMetrics>,
    config: WebSocketConfig,
    shutdown_rx: watch::Receiver<bool>,
    connection_id: ConnectionId,
}

impl ConnectionHandler {
    pub fn new(
        router: Arc<Router>,
        metrics: Arc<RelayMetrics>,
        config: WebSocketConfig,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            router,
            metrics,
            config,
            shutdown_rx,
            connection_id: ConnectionId::new(),
        }
    }

    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// Handle a WebSocket connection until it closes.
    pub async fn handle(mut self, socket: WebSocket) {
        let id = self.connection_id;
        let (handle, mailbox) = PeerHandle::new(id, self.config.outbound_buffer);
        let PeerMailbox {
            frames,
            mut close_rx,
        } = mailbox;

        self.metrics.record_connect();
        info!(connection_id = %id, "New relay connection");

        let (sink, mut stream) = socket.split();
        let writer = tokio::spawn(write_loop(
            id,
            sink,
            frames,
            close_rx.clone(),
            self.config.ping_interval,
            self.config.send_timeout,
        ));

        let mut state = ConnectionState::Open;

        let reason = loop {
            tokio::select! {
                biased;

                _ = signalled(&mut close_rx) => break CloseReason::Superseded,
                _ = signalled(&mut self.shutdown_rx) => break CloseReason::Shutdown,
                message = stream.next() => {
                    let frame = match message {
                        Some(Ok(Message::Text(text))) => Frame::Text(text),
                        Some(Ok(Message::Binary(data))) => Frame::Binary(data),
                        // Pongs for inbound pings are queued by the protocol layer.
                        Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                        Some(Ok(Message::Close(_))) | None => break CloseReason::PeerClosed,
                        Some(Err(e)) => {
                            warn!(connection_id = %id, error = %e, "WebSocket transport error");
                            break CloseReason::TransportError;
                        }
                    };

                    let report = self.router.dispatch(&handle, classify(frame)).await;
                    if let Some(role) = report.registered {
                        if state.role() != Some(role) {
                            debug!(connection_id = %id, from = %state, role = %role, "Connection state changed");
                        }
                        state = state.on_registered(role);
                    }
                }
            }
        };

        // Unregister first so no new frame is routed here, then stop the writer.
        self.router.registry().unregister(id);
        handle.close();
        if let Err(e) = writer.await {
            warn!(connection_id = %id, error = %e, "Writer task failed");
        }

        state = state.on_closed();
        self.metrics.record_disconnect();
        info!(
            connection_id = %id,
            reason = ?reason,
            state = %state,
            "Relay connection closed"
        );
    }
}

/// Drain the outbound queue into the socket.
async fn write_loop(
    id: ConnectionId,
    mut sink: SplitSink<WebSocket, Message>,
    mut frames: mpsc::Receiver<Frame>,
    mut close_rx: watch::Receiver<bool>,
    ping_interval: Duration,
    close_timeout: Duration,
) {
    let mut ping = tokio::time::interval(ping_interval);
    ping.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ping.tick().await;

    loop {
        tokio::select! {
            frame = frames.recv() => {
                let Some(frame) = frame else { break };
                if let Err(e) = sink.send(into_message(frame)).await {
                    debug!(connection_id = %id, error = %e, "Send failed, stopping writer");
                    // Dropping the queue marks the handle closed for lookups.
                    return;
                }
            }
            _ = ping.tick() => {
                if sink.send(Message::Ping(Vec::new())).await.is_err() {
                    return;
                }
            }
            _ = signalled(&mut close_rx) => break,
        }
    }

    let _ = tokio::time::timeout(close_timeout, sink.send(Message::Close(None))).await;
    let _ = tokio::time::timeout(close_timeout, sink.close()).await;
}

/// Resolves once the flag is set or its sender is gone.
pub(crate) async fn signalled(rx: &mut watch::Receiver<bool>) {
    // Drop the borrow guard here; the sender needs the write lock.
    let _ = rx.wait_for(|flag| *flag).await.map(|_| ());
}

fn into_message(frame: Frame) -> Message {
    match frame {
        Frame::Text(text) => Message::Text(text),
        Frame::Binary(data) => Message::Binary(data),
    }
}
