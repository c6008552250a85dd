//! Seam between the connector and whatever embeds it.
//!
//! In a web host the element implementing this trait is the custom element
//! wrapping the connector: `dispatch` raises bubbling, composed custom
//! events, `mount_node` names the child node sessions render into,
//! `set_block_display` applies the element's block styling on attach, and
//! `schedule_frame` defers work to the next paint opportunity.
//!
//! Keeping the seam abstract lets the connector run unchanged against the
//! channel-backed host in `infrastructure::channel_host` or the recording
//! host used by tests.

use remoteapp_core::{ConnectorEvent, MountNode};

/// Deferred work scheduled for the host's next frame opportunity.
pub type FrameCallback = Box<dyn FnOnce() + Send + 'static>;

/// The element (or element stand-in) hosting the connector.
pub trait HostElement: Send + Sync {
    /// Applies the host element's block display styling.
    ///
    /// Called once per attach, before initialization begins.
    fn set_block_display(&self);

    /// The child node streaming sessions render into.
    fn mount_node(&self) -> MountNode;

    /// Delivers a connector event to the host.
    ///
    /// Events must reach every listener the host has registered; in DOM
    /// terms they bubble and cross shadow boundaries.
    fn dispatch(&self, event: ConnectorEvent);

    /// Runs `callback` at the host's next frame opportunity.
    ///
    /// Used to defer the `Initialized` event until the session's first
    /// rendered state is observable.
    fn schedule_frame(&self, callback: FrameCallback);
}
