//! Peer handles.
//!
//! A [`PeerHandle`] is what the registry stores for a connection: an id, the
//! sending half of the connection's bounded outbound queue, an open flag and
//! a close signal. It never owns the socket. The receiving side
//! ([`PeerMailbox`]) belongs to the connection task that does.

use crate::domain::{ConnectionId, Frame, RelayError, Role};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

/// Registry-side reference to a live connection. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PeerHandle {
    id: ConnectionId,
    outbound: mpsc::Sender<Frame>,
    open: Arc<AtomicBool>,
    close_tx: Arc<watch::Sender<bool>>,
}

/// Connection-side end of a [`PeerHandle`].
#[derive(Debug)]
pub struct PeerMailbox {
    /// Frames routed to this connection, in send order
    pub frames: mpsc::Receiver<Frame>,
    /// Flips to `true` when the relay wants this connection closed
    pub close_rx: watch::Receiver<bool>,
}

impl PeerHandle {
    /// Create a handle and its mailbox with room for `capacity` queued frames.
    pub fn new(id: ConnectionId, capacity: usize) -> (Self, PeerMailbox) {
        let (outbound, frames) = mpsc::channel(capacity.max(1));
        let (close_tx, close_rx) = watch::channel(false);

        let handle = Self {
            id,
            outbound,
            open: Arc::new(AtomicBool::new(true)),
            close_tx: Arc::new(close_tx),
        };

        (handle, PeerMailbox { frames, close_rx })
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Open means: not closed by the relay and the connection task still
    /// drains the queue.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire) && !self.outbound.is_closed()
    }

    /// Mark the connection closed and signal its task to shut the socket.
    ///
    /// Idempotent.
    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
        self.close_tx.send_replace(true);
    }

    /// Queue a frame, waiting at most `timeout` for space.
    ///
    /// `role` is only used to label the error.
    pub async fn send(&self, frame: Frame, role: Role, timeout: Duration) -> Result<(), RelayError> {
        if !self.is_open() {
            return Err(RelayError::PeerGone(role));
        }

        match tokio::time::timeout(timeout, self.outbound.send(frame)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(RelayError::PeerGone(role)),
            Err(_) => Err(RelayError::SendTimeout { role, timeout }),
        }
    }
}

impl PartialEq for PeerHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PeerHandle {}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_send_delivers_in_order() {
        let (handle, mut mailbox) = PeerHandle::new(ConnectionId::new(), 8);

        handle.send(Frame::from("a"), Role::Controller, TIMEOUT).await.unwrap();
        handle.send(Frame::from(vec![1, 2]), Role::Controller, TIMEOUT).await.unwrap();

        assert_eq!(mailbox.frames.recv().await, Some(Frame::from("a")));
        assert_eq!(mailbox.frames.recv().await, Some(Frame::from(vec![1, 2])));
    }

    #[tokio::test]
    async fn test_full_queue_times_out() {
        let (handle, _mailbox) = PeerHandle::new(ConnectionId::new(), 1);

        handle.send(Frame::from("first"), Role::Producer, TIMEOUT).await.unwrap();
        let err = handle
            .send(Frame::from("second"), Role::Producer, TIMEOUT)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RelayError::SendTimeout {
                role: Role::Producer,
                timeout: TIMEOUT
            }
        );
        // Still open: a slow peer is not a dead peer.
        assert!(handle.is_open());
    }

    #[tokio::test]
    async fn test_dropped_mailbox_means_closed() {
        let (handle, mailbox) = PeerHandle::new(ConnectionId::new(), 4);
        drop(mailbox);

        assert!(!handle.is_open());
        let err = handle
            .send(Frame::from("x"), Role::Controller, TIMEOUT)
            .await
            .unwrap_err();
        assert_eq!(err, RelayError::PeerGone(Role::Controller));
    }

    #[tokio::test]
    async fn test_close_signals_mailbox() {
        let (handle, mut mailbox) = PeerHandle::new(ConnectionId::new(), 4);
        let observer = handle.clone();

        handle.close();

        assert!(!observer.is_open());
        assert!(*mailbox.close_rx.borrow_and_update());
    }

    #[test]
    fn test_equality_is_by_id() {
        let id = ConnectionId::new();
        let (a, _ma) = PeerHandle::new(id, 1);
        let (b, _mb) = PeerHandle::new(id, 1);
        let (c, _mc) = PeerHandle::new(ConnectionId::new(), 1);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
