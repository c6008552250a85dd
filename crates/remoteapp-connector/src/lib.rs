//! remoteapp-connector library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/` and
//! embedding hosts share the same module tree.
//!
//! # What does the connector do?
//!
//! The *connector* is the piece a host page embeds to show a desktop-GUI
//! application that runs remotely and is streamed by a third-party client
//! library.  It does no streaming, rendering, or protocol work itself; it is
//! a thin lifecycle adapter:
//!
//! 1. On attach, resolve a session-capable client for the configured URL
//!    (the only asynchronous step).
//! 2. Bootstrap one streaming session into the host's mount node, merging
//!    caller options over the connector defaults.
//! 3. Intercept the session's action callback and relay server-initiated
//!    actions to the host as `Action` events, Base64-transcoding any binary
//!    payload.
//! 4. Forward host-triggered actions to the server via `perform_action`.
//! 5. On detach, disconnect the session and discard any initialization that
//!    is still in flight.
//!
//! Overlapping initializations are ordered by a generation token: only the
//! most recent attempt may install a session handle, so rapid re-attachment
//! has last-initialization-wins semantics.

/// Application layer: the connector use case and its collaborator seams.
pub mod application;

/// Infrastructure layer: concrete host adapters and in-memory test doubles.
pub mod infrastructure;

pub use application::connector::{ConnectorError, RemoteAppConnector};
pub use application::host::{FrameCallback, HostElement};
pub use application::session::{
    ActionHook, ClientResolver, Injector, InjectorCallback, ResolveError, SessionHandle,
    StreamClient,
};
