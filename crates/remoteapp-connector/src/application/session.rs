//! Capability seam over the external screen-streaming client library.
//!
//! The connector never links the streaming library directly.  It sees three
//! narrow capabilities, each a trait object, so the whole adapter can be
//! exercised against in-memory fakes (see `infrastructure::mock`):
//!
//! ```text
//! ClientResolver ── resolve(url) ──► StreamClient ── bootstrap(...) ──► SessionHandle
//!      (async, may fail)                 (sync)                    (start/disconnect/actions)
//! ```
//!
//! The [`Injector`] is the library's extension point: during bootstrap the
//! client hands it to a connector-supplied callback, which may override the
//! internal action-event slot before the session goes live.

use std::sync::Arc;

use async_trait::async_trait;
use remoteapp_core::{ActionRequest, MountNode, SessionOptions};
use thiserror::Error;

/// Errors produced while resolving a streaming client for a URL.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The client library could not be loaded from the server.
    #[error("client library could not be loaded from {url}: {reason}")]
    Load { url: String, reason: String },

    /// The server answered, but what it served cannot host a session.
    #[error("client library at {url} is not session-capable")]
    NotSessionCapable { url: String },
}

/// Resolves a session-capable streaming client for a server URL.
///
/// This is the single asynchronous step of connector initialization; in the
/// real binding it covers fetching and evaluating the client library from
/// the streaming server.
#[async_trait]
pub trait ClientResolver: Send + Sync {
    /// Resolves the client serving `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the library cannot be loaded or is not
    /// session-capable.  The connector wraps the message into its own
    /// initialization error; it never retries.
    async fn resolve(&self, url: &str) -> Result<Arc<dyn StreamClient>, ResolveError>;
}

/// Hook receiving server-initiated action events from the session.
///
/// Arguments are the action name, optional textual data, and optional raw
/// binary data, exactly as the streaming library delivers them.
pub type ActionHook = Box<dyn Fn(&str, Option<&str>, Option<&[u8]>) + Send + Sync + 'static>;

/// Callback the connector passes to [`StreamClient::bootstrap`] to configure
/// the session's internal hooks before it goes live.
pub type InjectorCallback = Box<dyn FnOnce(&mut Injector) + Send + 'static>;

/// Overridable internal hooks of a streaming session.
///
/// The streaming library owns the slots; the connector's injector callback
/// fills them in during bootstrap.  A `None` slot means the library's own
/// default handling stays in place.
#[derive(Default)]
pub struct Injector {
    /// Handler for server-initiated action events.
    pub handle_action_event: Option<ActionHook>,
}

/// A resolved, session-capable streaming client.
pub trait StreamClient: Send + Sync {
    /// Creates a streaming session rendering into `mount`.
    ///
    /// `configure` runs synchronously during bootstrap with the session's
    /// [`Injector`], before any session callback can fire.  When
    /// `options.auto_start` is set the client starts the session itself,
    /// invoking `options.on_start` without any further host involvement.
    fn bootstrap(
        &self,
        mount: MountNode,
        options: SessionOptions,
        configure: InjectorCallback,
    ) -> Arc<dyn SessionHandle>;
}

/// One live streaming session.
///
/// Owned exclusively by the connector between successful initialization and
/// disconnect.  All operations are fire-and-forget toward the streaming
/// library; failures surface through the library's own channels, not here.
pub trait SessionHandle: Send + Sync {
    /// Starts the remote application.
    fn start(&self);

    /// Tears the session down.
    fn disconnect(&self);

    /// Forwards a host-triggered action to the server-side listener.
    fn perform_action(&self, request: ActionRequest);
}
