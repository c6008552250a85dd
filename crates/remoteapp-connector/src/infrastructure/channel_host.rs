//! Channel-backed host element.
//!
//! Embedders that are not DOM elements still need somewhere for connector
//! events to go.  `ChannelHost` turns the host seam into a tokio mpsc
//! stream: every dispatched event is sent to the receiver returned by
//! [`ChannelHost::new`], and frame scheduling becomes "run on the next
//! event-loop turn".
//!
//! If the receiver is dropped, further events are logged and discarded —
//! the connector itself never fails because nobody is listening.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use remoteapp_core::{ConnectorEvent, MountNode};
use tokio::sync::mpsc;
use tracing::warn;

use crate::application::host::{FrameCallback, HostElement};

/// A host element that surfaces connector events as an mpsc stream.
pub struct ChannelHost {
    mount: MountNode,
    events: mpsc::UnboundedSender<ConnectorEvent>,
    block_display: AtomicBool,
}

impl ChannelHost {
    /// Creates a host rendering into `mount`, returning the host and the
    /// receiving end of its event stream.
    pub fn new(mount: MountNode) -> (Arc<Self>, mpsc::UnboundedReceiver<ConnectorEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Arc::new(Self {
                mount,
                events: tx,
                block_display: AtomicBool::new(false),
            }),
            rx,
        )
    }

    /// Whether the connector has applied block display styling.
    pub fn is_block_display(&self) -> bool {
        self.block_display.load(Ordering::Relaxed)
    }
}

impl HostElement for ChannelHost {
    fn set_block_display(&self) {
        self.block_display.store(true, Ordering::Relaxed);
    }

    fn mount_node(&self) -> MountNode {
        self.mount.clone()
    }

    fn dispatch(&self, event: ConnectorEvent) {
        if self.events.send(event).is_err() {
            warn!("event receiver dropped; connector event discarded");
        }
    }

    fn schedule_frame(&self, callback: FrameCallback) {
        // The closest event-loop analogue of a next-paint slot: run after
        // the current turn completes.
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            callback();
        });
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_dispatch_reaches_the_receiver() {
        // Arrange
        let (host, mut rx) = ChannelHost::new(MountNode::default());

        // Act
        host.dispatch(ConnectorEvent::Started);

        // Assert
        let event = assert_ok!(rx.try_recv());
        assert_eq!(event, ConnectorEvent::Started);
    }

    #[tokio::test]
    async fn test_dispatch_survives_a_dropped_receiver() {
        let (host, rx) = ChannelHost::new(MountNode::default());
        drop(rx);

        // Must not panic; the event is discarded.
        host.dispatch(ConnectorEvent::Initialized);
    }

    #[tokio::test]
    async fn test_scheduled_frame_runs_on_a_later_turn() {
        let (host, _rx) = ChannelHost::new(MountNode::default());
        let (tx, rx) = tokio::sync::oneshot::channel();

        host.schedule_frame(Box::new(move || {
            let _ = tx.send(());
        }));

        assert_ok!(rx.await);
    }

    #[tokio::test]
    async fn test_block_display_is_recorded() {
        let (host, _rx) = ChannelHost::new(MountNode::default());
        assert!(!host.is_block_display());

        host.set_block_display();

        assert!(host.is_block_display());
    }
}
