//! The `RemoteAppConnector` use case.
//!
//! One connector instance owns at most one streaming session and walks it
//! through a small lifecycle:
//!
//! ```text
//! uninitialized ──attach──► initializing ──resolve ok──► ready
//!                                │  (latest generation only)  │
//!                                │                         start()
//!                resolve err ────┘                            ▼
//!                (error surfaced)                          started
//!
//!                 detach (from any state) ──► disconnected
//! ```
//!
//! Initialization is restartable: every attempt mints a generation token
//! before the asynchronous resolve and re-checks it afterwards, so under
//! rapid re-attachment only the most recent attempt installs a handle and
//! superseded attempts vanish without side effects.  `detach` advances the
//! generation too, which closes the window where a late-settling resolve
//! could install a handle into a torn-down connector.

use std::sync::{Arc, Mutex};

use remoteapp_core::transcode::{decode_binary, encode_binary, TranscodeError};
use remoteapp_core::{
    ActionEvent, ActionRequest, ConnectorEvent, ConnectorOptions, InitGeneration, SessionOptions,
};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::application::host::HostElement;
use crate::application::session::{ClientResolver, InjectorCallback, SessionHandle};

/// Errors surfaced by the connector's public operations.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// `start()` was called after the session already started.
    #[error("instance already started")]
    AlreadyStarted,

    /// `start()` was called before a session handle exists.
    #[error("no instance initialized")]
    NoInstance,

    /// Resolving the streaming client failed; carries the underlying
    /// cause's message.
    #[error("failed to initialize streaming session: {0}")]
    Initialization(String),

    /// A binary action payload failed the Base64 transcode.
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
}

/// Handle plus started flag, guarded together so detach and a settling
/// initialization cannot interleave.
#[derive(Default)]
struct SessionState {
    instance: Option<Arc<dyn SessionHandle>>,
    started: bool,
}

/// Bridges a host element to one remotely streamed desktop application.
///
/// The connector is a thin adapter: the streaming library (behind
/// [`ClientResolver`] and friends) does all rendering and protocol work;
/// the host element (behind [`HostElement`]) receives the translated
/// events.  State is fully instance-scoped — embedding several connectors
/// in one host is fine.
pub struct RemoteAppConnector {
    /// The streaming server URL.  Immutable once initialization begins.
    url: String,
    resolver: Arc<dyn ClientResolver>,
    host: Arc<dyn HostElement>,
    options: Mutex<Option<ConnectorOptions>>,
    state: Mutex<SessionState>,
    generation: InitGeneration,
}

impl RemoteAppConnector {
    /// Creates a connector for `url`, embedded in `host` and resolving
    /// streaming clients through `resolver`.
    pub fn new(
        url: impl Into<String>,
        resolver: Arc<dyn ClientResolver>,
        host: Arc<dyn HostElement>,
    ) -> Arc<Self> {
        Arc::new(Self {
            url: url.into(),
            resolver,
            host,
            options: Mutex::new(None),
            state: Mutex::new(SessionState::default()),
            generation: InitGeneration::new(),
        })
    }

    /// The configured streaming server URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Sets the caller options overlay.
    ///
    /// Takes effect at the next initialization; an initialization already
    /// past its capture point keeps the options it captured.
    pub fn set_options(&self, options: ConnectorOptions) {
        *self.options.lock().unwrap() = Some(options);
    }

    /// A snapshot of the caller options overlay, if one was set.
    pub fn options(&self) -> Option<ConnectorOptions> {
        self.options.lock().unwrap().clone()
    }

    /// `true` once a session handle is installed and not yet torn down.
    pub fn is_initialized(&self) -> bool {
        self.state.lock().unwrap().instance.is_some()
    }

    /// `true` once `start()` has succeeded (or the session auto-started
    /// through the connector's `start()`).
    pub fn is_started(&self) -> bool {
        self.state.lock().unwrap().started
    }

    /// Attaches the connector to its host: applies the host's block
    /// styling and begins asynchronous initialization.
    ///
    /// Initialization runs on a spawned task; failures are logged, not
    /// returned.  Hosts that want the error should call
    /// [`initialize`](Self::initialize) themselves instead.  Re-attaching
    /// restarts initialization; the previous attempt, if unsettled, is
    /// superseded.
    pub fn attach(self: &Arc<Self>) {
        self.host.set_block_display();
        let connector = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(cause) = connector.initialize().await {
                error!(%cause, url = %connector.url, "connector initialization failed");
            }
        });
    }

    /// Detaches the connector from its host.
    ///
    /// Disconnects the session handle if one exists, clears it together
    /// with the started flag, and invalidates any initialization still in
    /// flight so it cannot install a handle afterwards.
    pub fn detach(&self) {
        let instance = {
            let mut state = self.state.lock().unwrap();
            self.generation.invalidate();
            state.started = false;
            state.instance.take()
        };
        // Lock released: disconnect runs library code that may call back
        // into the connector.
        if let Some(instance) = instance {
            debug!(url = %self.url, "disconnecting session on detach");
            instance.disconnect();
        }
    }

    /// Starts the remote application.
    ///
    /// With `auto_start` unset (the default) the host must call this once
    /// after the `Initialized` event; the session's own start callback then
    /// surfaces as `Started`.
    ///
    /// # Errors
    ///
    /// [`ConnectorError::AlreadyStarted`] on a second call,
    /// [`ConnectorError::NoInstance`] before a session handle exists.
    pub fn start(&self) -> Result<(), ConnectorError> {
        let instance = {
            let mut state = self.state.lock().unwrap();
            if state.started {
                return Err(ConnectorError::AlreadyStarted);
            }
            let Some(instance) = &state.instance else {
                return Err(ConnectorError::NoInstance);
            };
            let instance = Arc::clone(instance);
            state.started = true;
            instance
        };
        // Lock released: the session's start callback may dispatch events
        // synchronously.
        instance.start();
        Ok(())
    }

    /// Forwards an action to the server-side listener registered under
    /// `action_name`.
    ///
    /// The optional Base64 payload is decoded to raw bytes first; an absent
    /// payload is forwarded as absent, never as an empty placeholder.
    /// Before a session handle exists the action is silently dropped.
    ///
    /// # Errors
    ///
    /// [`ConnectorError::Transcode`] when `binary_data_base64` is not valid
    /// Base64.  The payload is decoded before the handle check, so a bad
    /// payload fails even while no session exists.
    pub fn perform_action(
        &self,
        action_name: &str,
        data: Option<&str>,
        binary_data_base64: Option<&str>,
    ) -> Result<(), ConnectorError> {
        let binary_data = decode_binary(binary_data_base64)?;

        let instance = self.state.lock().unwrap().instance.as_ref().map(Arc::clone);
        let Some(instance) = instance else {
            debug!(action_name, "no session handle yet; action dropped");
            return Ok(());
        };

        instance.perform_action(ActionRequest {
            action_name: action_name.to_string(),
            data: data.map(str::to_string),
            binary_data,
        });
        Ok(())
    }

    /// [`perform_action`](Self::perform_action) without a binary payload.
    pub fn perform_action_with_data(
        &self,
        action_name: &str,
        data: &str,
    ) -> Result<(), ConnectorError> {
        self.perform_action(action_name, Some(data), None)
    }

    /// [`perform_action`](Self::perform_action) with neither data nor a
    /// binary payload.
    pub fn perform_named_action(&self, action_name: &str) -> Result<(), ConnectorError> {
        self.perform_action(action_name, None, None)
    }

    /// Runs one initialization attempt to completion.
    ///
    /// Resolves a streaming client for the configured URL, merges caller
    /// options over the connector defaults, bootstraps a session into the
    /// host's mount node, and installs the resulting handle — unless a
    /// newer attempt (or a detach) superseded this one while the resolve
    /// was in flight, in which case nothing observable happens.
    ///
    /// # Errors
    ///
    /// [`ConnectorError::Initialization`] when the resolve fails, wrapping
    /// the cause's message.  No retry is attempted.
    pub async fn initialize(&self) -> Result<(), ConnectorError> {
        let url = self.url.clone();
        let overlay = self.options.lock().unwrap().clone();
        let token = self.generation.mint();
        debug!(token, url = %url, "resolving streaming client");

        // The only suspension point.  Everything after it must re-check the
        // generation before touching connector state.
        let client = self
            .resolver
            .resolve(&url)
            .await
            .map_err(|cause| ConnectorError::Initialization(cause.to_string()))?;

        if !self.generation.is_current(token) {
            debug!(token, "initialization superseded; discarding resolved client");
            return Ok(());
        }

        let start_host = Arc::clone(&self.host);
        let mut options = SessionOptions::defaults(
            url,
            Arc::new(move || start_host.dispatch(ConnectorEvent::Started)),
        );
        if let Some(overlay) = &overlay {
            options = options.merged_with(overlay);
        }

        let hook_host = Arc::clone(&self.host);
        let frame_host = Arc::clone(&self.host);
        let configure: InjectorCallback = Box::new(move |injector| {
            injector.handle_action_event = Some(Box::new(move |action_name, data, binary_data| {
                let binary_data_base64 = match encode_binary(binary_data) {
                    Ok(encoded) => encoded,
                    Err(cause) => {
                        warn!(action_name, %cause, "dropping untranscodable action payload");
                        None
                    }
                };
                hook_host.dispatch(ConnectorEvent::Action(ActionEvent {
                    action_name: action_name.to_string(),
                    data: data.map(str::to_string),
                    binary_data_base64,
                }));
            }));

            let init_host = Arc::clone(&frame_host);
            frame_host.schedule_frame(Box::new(move || {
                init_host.dispatch(ConnectorEvent::Initialized);
            }));
        });

        // Bootstrap runs library code (configure, frame scheduling, the
        // auto-start path) that may call back into the connector, so no
        // lock is held across it.
        let handle = client.bootstrap(self.host.mount_node(), options, configure);

        {
            let mut state = self.state.lock().unwrap();
            if self.generation.is_current(token) {
                state.instance = Some(handle);
                debug!(token, "session handle installed");
                return Ok(());
            }
        }

        // A detach or newer attempt landed while bootstrap ran; the fresh
        // session must not outlive it.
        debug!(token, "initialization superseded during bootstrap; disconnecting session");
        handle.disconnect();
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::host::FrameCallback;
    use crate::infrastructure::mock::{MockClientResolver, MockStreamClient, RecordingHost};
    use remoteapp_core::MountNode;

    // mockall double for the session handle, used where tests only need
    // call expectations rather than the stateful recording mock.
    mockall::mock! {
        pub Session {}

        impl SessionHandle for Session {
            fn start(&self);
            fn disconnect(&self);
            fn perform_action(&self, request: ActionRequest);
        }
    }

    /// Builds a connector wired to an in-memory client and host, without
    /// running initialization.
    fn make_connector() -> (
        Arc<RemoteAppConnector>,
        Arc<MockStreamClient>,
        Arc<RecordingHost>,
    ) {
        let client = MockStreamClient::new();
        let resolver = Arc::new(MockClientResolver::succeeding(Arc::clone(&client)));
        let host = RecordingHost::new();
        let connector =
            RemoteAppConnector::new("http://localhost:8080/app", resolver, host.clone());
        (connector, client, host)
    }

    #[test]
    fn test_start_before_initialization_fails_with_no_instance() {
        // Arrange
        let (connector, _client, _host) = make_connector();

        // Act
        let err = connector.start().unwrap_err();

        // Assert
        assert!(matches!(err, ConnectorError::NoInstance));
    }

    #[tokio::test]
    async fn test_second_start_fails_with_already_started() {
        // Arrange
        let (connector, _client, _host) = make_connector();
        connector.initialize().await.unwrap();

        // Act
        connector.start().unwrap();
        let err = connector.start().unwrap_err();

        // Assert
        assert!(matches!(err, ConnectorError::AlreadyStarted));
    }

    #[tokio::test]
    async fn test_start_invokes_session_exactly_once() {
        let (connector, client, _host) = make_connector();
        connector.initialize().await.unwrap();

        connector.start().unwrap();

        assert_eq!(*client.last_session().starts.lock().unwrap(), 1);
        assert!(connector.is_started());
    }

    #[test]
    fn test_perform_action_without_instance_is_a_silent_no_op() {
        let (connector, client, _host) = make_connector();

        let result = connector.perform_action("export", Some("csv"), None);

        assert!(result.is_ok());
        assert!(client.sessions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_perform_action_forwards_absent_binary_data_as_absent() {
        // Arrange: a mockall session that insists binary_data is None.
        let mut session = MockSession::new();
        session
            .expect_perform_action()
            .withf(|request| {
                request.action_name == "export"
                    && request.data.as_deref() == Some("csv")
                    && request.binary_data.is_none()
            })
            .times(1)
            .return_const(());
        let client = MockStreamClient::with_handle(Arc::new(session));
        let resolver = Arc::new(MockClientResolver::succeeding(Arc::clone(&client)));
        let connector =
            RemoteAppConnector::new("http://localhost/app", resolver, RecordingHost::new());
        connector.initialize().await.unwrap();

        // Act / Assert (expectation checked on drop)
        connector.perform_action("export", Some("csv"), None).unwrap();
    }

    #[tokio::test]
    async fn test_perform_action_decodes_base64_payload() {
        let mut session = MockSession::new();
        session
            .expect_perform_action()
            .withf(|request| request.binary_data.as_deref() == Some(&[0x41][..]))
            .times(1)
            .return_const(());
        let client = MockStreamClient::with_handle(Arc::new(session));
        let resolver = Arc::new(MockClientResolver::succeeding(Arc::clone(&client)));
        let connector =
            RemoteAppConnector::new("http://localhost/app", resolver, RecordingHost::new());
        connector.initialize().await.unwrap();

        connector.perform_action("upload", None, Some("QQ==")).unwrap();
    }

    #[tokio::test]
    async fn test_perform_action_rejects_invalid_base64() {
        let (connector, client, _host) = make_connector();
        connector.initialize().await.unwrap();

        let err = connector
            .perform_action("upload", None, Some("!!not-base64!!"))
            .unwrap_err();

        assert!(matches!(err, ConnectorError::Transcode(_)));
        assert!(client.last_session().actions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detach_disconnects_exactly_once_and_resets_state() {
        let (connector, client, _host) = make_connector();
        connector.initialize().await.unwrap();
        connector.start().unwrap();

        connector.detach();

        let session = client.last_session();
        assert_eq!(*session.disconnects.lock().unwrap(), 1);
        assert!(!connector.is_initialized());
        assert!(!connector.is_started());
        assert!(matches!(
            connector.start().unwrap_err(),
            ConnectorError::NoInstance
        ));
    }

    #[test]
    fn test_detach_without_instance_is_harmless() {
        let (connector, client, _host) = make_connector();

        connector.detach();

        assert!(client.sessions.lock().unwrap().is_empty());
        assert!(!connector.is_initialized());
    }

    #[tokio::test]
    async fn test_initialization_failure_wraps_the_cause() {
        // Arrange
        let resolver = Arc::new(MockClientResolver::failing("connection refused"));
        let connector =
            RemoteAppConnector::new("http://localhost/app", resolver, RecordingHost::new());

        // Act
        let err = connector.initialize().await.unwrap_err();

        // Assert: the cause's message is carried in the error text.
        assert!(matches!(err, ConnectorError::Initialization(_)));
        assert!(err.to_string().contains("connection refused"));
        assert!(!connector.is_initialized());
    }

    #[tokio::test]
    async fn test_options_are_merged_over_defaults_at_bootstrap() {
        let (connector, client, _host) = make_connector();
        connector.set_options(
            ConnectorOptions::new()
                .with_auto_start(false)
                .with_realm("customers"),
        );

        connector.initialize().await.unwrap();

        let bootstraps = client.bootstraps.lock().unwrap();
        assert_eq!(bootstraps.len(), 1);
        // Default retained for the key the overlay left unset.
        assert_eq!(bootstraps[0].connection_url, "http://localhost:8080/app");
        assert!(!bootstraps[0].auto_start);
        assert_eq!(bootstraps[0].extra["realm"], "customers");
    }

    #[tokio::test]
    async fn test_start_hook_can_read_connector_state_during_bootstrap() {
        // Arrange: with auto-start the hook fires from inside bootstrap,
        // and this one reads back through the connector's public accessors.
        let (connector, client, _host) = make_connector();
        let observed = Arc::new(Mutex::new(None));
        let hook_connector = Arc::clone(&connector);
        let hook_observed = Arc::clone(&observed);
        connector.set_options(
            ConnectorOptions::new()
                .with_auto_start(true)
                .with_on_start(Arc::new(move || {
                    *hook_observed.lock().unwrap() = Some(hook_connector.is_started());
                })),
        );

        // Act: must run to completion, not block on the connector's own
        // state lock.
        connector.initialize().await.unwrap();

        // Assert: the hook observed the started flag (false, since only
        // start() sets it) and the session auto-started once.
        assert_eq!(*observed.lock().unwrap(), Some(false));
        assert_eq!(*client.last_session().starts.lock().unwrap(), 1);
    }

    /// A host whose frame scheduling tears the connector down, modelling a
    /// host element removed while the library is still wiring up the
    /// session.
    struct DetachingHost {
        inner: Arc<RecordingHost>,
        connector: Mutex<Option<Arc<RemoteAppConnector>>>,
    }

    impl HostElement for DetachingHost {
        fn set_block_display(&self) {
            self.inner.set_block_display();
        }

        fn mount_node(&self) -> MountNode {
            self.inner.mount_node()
        }

        fn dispatch(&self, event: ConnectorEvent) {
            self.inner.dispatch(event);
        }

        fn schedule_frame(&self, callback: FrameCallback) {
            if let Some(connector) = &*self.connector.lock().unwrap() {
                connector.detach();
            }
            self.inner.schedule_frame(callback);
        }
    }

    #[tokio::test]
    async fn test_detach_during_bootstrap_discards_the_fresh_session() {
        // Arrange
        let client = MockStreamClient::new();
        let resolver = Arc::new(MockClientResolver::succeeding(Arc::clone(&client)));
        let host = Arc::new(DetachingHost {
            inner: RecordingHost::new(),
            connector: Mutex::new(None),
        });
        let connector =
            RemoteAppConnector::new("http://localhost:8080/app", resolver, host.clone());
        *host.connector.lock().unwrap() = Some(Arc::clone(&connector));

        // Act: the detach lands mid-bootstrap, from inside the host seam.
        connector.initialize().await.unwrap();

        // Assert: no handle was installed, and the session bootstrapped by
        // the superseded attempt was disconnected rather than leaked.
        assert!(!connector.is_initialized());
        assert_eq!(*client.last_session().disconnects.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_reinitialization_replaces_the_handle() {
        // Re-invoking initialize is the restart path; the newer handle wins.
        let (connector, client, _host) = make_connector();
        connector.initialize().await.unwrap();
        connector.initialize().await.unwrap();

        assert_eq!(client.bootstraps.lock().unwrap().len(), 2);
        assert!(connector.is_initialized());
    }
}
