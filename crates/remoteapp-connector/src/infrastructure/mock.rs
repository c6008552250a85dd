//! In-memory recording doubles for the streaming-library and host seams.
//!
//! # Why recording mocks?
//!
//! The real streaming library fetches and evaluates remote code, opens a
//! socket to the streaming server, and paints into a rendering surface —
//! none of which a test can (or should) do.  These doubles replace every
//! external call with in-memory recording, so tests can drive the connector
//! through its whole lifecycle and then inspect exactly what crossed each
//! seam and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let client = MockStreamClient::new();
//! let resolver = Arc::new(MockClientResolver::succeeding(Arc::clone(&client)));
//! let host = RecordingHost::new();
//! let connector = RemoteAppConnector::new("http://localhost/app", resolver, host.clone());
//!
//! connector.initialize().await.unwrap();
//!
//! // Simulate the server pushing an action to the session.
//! client.fire_action("refresh", None, None);
//! assert_eq!(host.events().len(), 1);
//! ```
//!
//! # Gated resolution
//!
//! [`MockClientResolver::gated`] parks each `resolve` call on a semaphore
//! until the test releases it with `add_permits(1)`.  Waiters are released
//! in FIFO order, which is what lets tests interleave two initialization
//! attempts deterministically and observe last-initialization-wins.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use remoteapp_core::{ActionRequest, ConnectorEvent, MountNode, SessionOptions, StartHook};
use serde_json::{Map, Value};
use tokio::sync::Semaphore;

use crate::application::host::{FrameCallback, HostElement};
use crate::application::session::{
    ClientResolver, Injector, InjectorCallback, ResolveError, SessionHandle, StreamClient,
};

// ── Client resolver ───────────────────────────────────────────────────────────

/// A resolver that yields a preconfigured client, fails, or waits on a gate.
pub struct MockClientResolver {
    client: Option<Arc<MockStreamClient>>,
    failure: Option<String>,
    gate: Option<Arc<Semaphore>>,
    /// Every URL passed to `resolve`, in call order.
    pub resolved_urls: Mutex<Vec<String>>,
}

impl MockClientResolver {
    /// Resolves every URL to `client`.
    pub fn succeeding(client: Arc<MockStreamClient>) -> Self {
        Self {
            client: Some(client),
            failure: None,
            gate: None,
            resolved_urls: Mutex::new(Vec::new()),
        }
    }

    /// Fails every resolution with the given reason.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            client: None,
            failure: Some(reason.into()),
            gate: None,
            resolved_urls: Mutex::new(Vec::new()),
        }
    }

    /// Resolves to `client`, but each call first waits for one permit on
    /// `gate`.  Release calls one at a time with `gate.add_permits(1)`.
    pub fn gated(client: Arc<MockStreamClient>, gate: Arc<Semaphore>) -> Self {
        Self {
            client: Some(client),
            failure: None,
            gate: Some(gate),
            resolved_urls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ClientResolver for MockClientResolver {
    async fn resolve(&self, url: &str) -> Result<Arc<dyn StreamClient>, ResolveError> {
        self.resolved_urls.lock().unwrap().push(url.to_string());

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        if let Some(reason) = &self.failure {
            return Err(ResolveError::Load {
                url: url.to_string(),
                reason: reason.clone(),
            });
        }

        let client: Arc<dyn StreamClient> =
            self.client.as_ref().expect("no client configured").clone();
        Ok(client)
    }
}

// ── Stream client ─────────────────────────────────────────────────────────────

/// Snapshot of one `bootstrap` call, minus the non-comparable start hook.
pub struct BootstrapRecord {
    /// The mount node the session was asked to render into.
    pub mount: MountNode,
    /// Merged connection URL.
    pub connection_url: String,
    /// Merged auto-start flag.
    pub auto_start: bool,
    /// Merged free-form options.
    pub extra: Map<String, Value>,
}

/// A stream client that records bootstraps and captures the injector.
///
/// Each bootstrap creates a fresh [`MockSessionHandle`] (unless a fixed
/// handle was supplied via [`with_handle`](MockStreamClient::with_handle))
/// and, when `auto_start` is merged in, starts it immediately the way the
/// real library does.
pub struct MockStreamClient {
    injected_handle: Mutex<Option<Arc<dyn SessionHandle>>>,
    /// Every session handle created by `bootstrap`, in creation order.
    pub sessions: Mutex<Vec<Arc<MockSessionHandle>>>,
    /// One record per `bootstrap` call, in call order.
    pub bootstraps: Mutex<Vec<BootstrapRecord>>,
    /// The injector configured by the most recent bootstrap.
    pub injector: Mutex<Option<Injector>>,
}

impl MockStreamClient {
    /// A client creating a fresh recording session per bootstrap.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            injected_handle: Mutex::new(None),
            sessions: Mutex::new(Vec::new()),
            bootstraps: Mutex::new(Vec::new()),
            injector: Mutex::new(None),
        })
    }

    /// A client that hands out `handle` from every bootstrap, for tests
    /// that bring their own double (e.g. a mockall session).
    pub fn with_handle(handle: Arc<dyn SessionHandle>) -> Arc<Self> {
        let client = Self::new();
        *client.injected_handle.lock().unwrap() = Some(handle);
        client
    }

    /// The session created by the most recent bootstrap.
    ///
    /// # Panics
    ///
    /// Panics when no bootstrap has happened yet.
    pub fn last_session(&self) -> Arc<MockSessionHandle> {
        let sessions = self.sessions.lock().unwrap();
        Arc::clone(sessions.last().expect("no session bootstrapped yet"))
    }

    /// Simulates the server signalling an action: invokes the action hook
    /// installed by the connector's injector callback.
    ///
    /// # Panics
    ///
    /// Panics when no bootstrap installed a hook yet.
    pub fn fire_action(&self, action_name: &str, data: Option<&str>, binary_data: Option<&[u8]>) {
        let injector = self.injector.lock().unwrap();
        let hook = injector
            .as_ref()
            .and_then(|i| i.handle_action_event.as_ref())
            .expect("no action hook installed");
        hook(action_name, data, binary_data);
    }
}

impl StreamClient for MockStreamClient {
    fn bootstrap(
        &self,
        mount: MountNode,
        options: SessionOptions,
        configure: InjectorCallback,
    ) -> Arc<dyn SessionHandle> {
        // The real library configures hooks before the session goes live.
        let mut injector = Injector::default();
        configure(&mut injector);
        *self.injector.lock().unwrap() = Some(injector);

        self.bootstraps.lock().unwrap().push(BootstrapRecord {
            mount,
            connection_url: options.connection_url.clone(),
            auto_start: options.auto_start,
            extra: options.extra.clone(),
        });

        let handle: Arc<dyn SessionHandle> = match &*self.injected_handle.lock().unwrap() {
            Some(handle) => Arc::clone(handle),
            None => {
                let session = Arc::new(MockSessionHandle::new(Arc::clone(&options.on_start)));
                self.sessions.lock().unwrap().push(Arc::clone(&session));
                session
            }
        };

        if options.auto_start {
            handle.start();
        }
        handle
    }
}

// ── Session handle ────────────────────────────────────────────────────────────

/// A session handle that records every call.
///
/// `start` invokes the merged start hook, mirroring the real library's
/// behavior of calling `on_start` when the remote application starts.
pub struct MockSessionHandle {
    on_start: StartHook,
    /// Number of `start` calls.
    pub starts: Mutex<u32>,
    /// Number of `disconnect` calls.
    pub disconnects: Mutex<u32>,
    /// Every forwarded action request, in call order.
    pub actions: Mutex<Vec<ActionRequest>>,
}

impl MockSessionHandle {
    /// Creates a handle that reports starts through `on_start`.
    pub fn new(on_start: StartHook) -> Self {
        Self {
            on_start,
            starts: Mutex::new(0),
            disconnects: Mutex::new(0),
            actions: Mutex::new(Vec::new()),
        }
    }
}

impl SessionHandle for MockSessionHandle {
    fn start(&self) {
        *self.starts.lock().unwrap() += 1;
        (self.on_start)();
    }

    fn disconnect(&self) {
        *self.disconnects.lock().unwrap() += 1;
    }

    fn perform_action(&self, request: ActionRequest) {
        self.actions.lock().unwrap().push(request);
    }
}

// ── Host ──────────────────────────────────────────────────────────────────────

/// A host element that records events and defers frames until pumped.
///
/// Scheduled frame callbacks are held until the test calls
/// [`run_scheduled_frames`](RecordingHost::run_scheduled_frames), making
/// the deferred `Initialized` dispatch observable as a distinct step.
pub struct RecordingHost {
    mount: MountNode,
    /// Every dispatched event, in dispatch order.
    pub events: Mutex<Vec<ConnectorEvent>>,
    /// Number of `set_block_display` calls.
    pub block_display_calls: Mutex<u32>,
    frames: Mutex<Vec<FrameCallback>>,
}

impl RecordingHost {
    /// Creates a host with the default mount node and no recorded activity.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            mount: MountNode::default(),
            events: Mutex::new(Vec::new()),
            block_display_calls: Mutex::new(0),
            frames: Mutex::new(Vec::new()),
        })
    }

    /// A snapshot of the dispatched events.
    pub fn events(&self) -> Vec<ConnectorEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Runs and drains all pending frame callbacks, returning how many ran.
    pub fn run_scheduled_frames(&self) -> usize {
        let frames: Vec<FrameCallback> = self.frames.lock().unwrap().drain(..).collect();
        let count = frames.len();
        for frame in frames {
            frame();
        }
        count
    }
}

impl HostElement for RecordingHost {
    fn set_block_display(&self) {
        *self.block_display_calls.lock().unwrap() += 1;
    }

    fn mount_node(&self) -> MountNode {
        self.mount.clone()
    }

    fn dispatch(&self, event: ConnectorEvent) {
        self.events.lock().unwrap().push(event);
    }

    fn schedule_frame(&self, callback: FrameCallback) {
        self.frames.lock().unwrap().push(callback);
    }
}
