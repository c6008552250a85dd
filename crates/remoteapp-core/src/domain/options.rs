//! Session options: caller overlay, library defaults, and the merge.
//!
//! The connector hands the streaming client a single options structure at
//! bootstrap.  It is built in two layers:
//!
//! 1. **Defaults** ([`SessionOptions::defaults`]) — connection URL taken
//!    from the connector's configured URL, auto-start disabled, and a start
//!    hook that reports the session's start back to the host.
//! 2. **Caller overlay** ([`ConnectorOptions`]) — every field is optional;
//!    a set field replaces the default (last-write-wins), an unset field
//!    retains it.  Free-form keys the client library understands but this
//!    crate does not model travel in the `extra` map untouched.
//!
//! The well-known keys (`autoReconnect`, `securityToken`, `realm`, ...) use
//! the client library's own camelCase spellings, so the `extra` map can be
//! passed to it verbatim.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

/// Callback invoked by the streaming client when the session starts.
pub type StartHook = Arc<dyn Fn() + Send + Sync + 'static>;

/// Caller-supplied options overlay for a streaming session.
///
/// All fields are optional; unset fields retain the connector defaults.
/// Built fluently:
///
/// ```rust
/// use remoteapp_core::ConnectorOptions;
///
/// let options = ConnectorOptions::new()
///     .with_auto_start(true)
///     .with_auto_reconnect(5000)
///     .with_realm("customers");
/// ```
#[derive(Clone, Default)]
pub struct ConnectorOptions {
    /// Overrides the connection URL derived from the connector's `url`.
    pub connection_url: Option<String>,
    /// Overrides whether the client library starts the session by itself
    /// right after initialization.
    pub auto_start: Option<bool>,
    /// Replaces the connector's own start hook.
    ///
    /// The default hook is what surfaces the `Started` event; replacing it
    /// means the host takes over start notification entirely.
    pub on_start: Option<StartHook>,
    /// Free-form options passed through to the client library.
    pub extra: Map<String, Value>,
}

impl ConnectorOptions {
    /// Creates an empty overlay (every default retained).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connection URL override.
    pub fn with_connection_url(mut self, url: impl Into<String>) -> Self {
        self.connection_url = Some(url.into());
        self
    }

    /// Sets whether the client library starts the session automatically.
    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = Some(auto_start);
        self
    }

    /// Replaces the start hook.
    pub fn with_on_start(mut self, hook: StartHook) -> Self {
        self.on_start = Some(hook);
        self
    }

    /// Milliseconds to wait before a reconnection attempt after the server
    /// connection is lost.
    pub fn with_auto_reconnect(self, millis: u32) -> Self {
        self.with_extra("autoReconnect", millis.into())
    }

    /// Security token forwarded to the server during the handshake.
    pub fn with_security_token(self, token: impl Into<String>) -> Self {
        self.with_extra("securityToken", Value::String(token.into()))
    }

    /// Security realm used when the server hosts multiple applications.
    pub fn with_realm(self, realm: impl Into<String>) -> Self {
        self.with_extra("realm", Value::String(realm.into()))
    }

    /// Additional program arguments passed to the remote application.
    pub fn with_args(self, args: impl Into<String>) -> Self {
        self.with_extra("args", Value::String(args.into()))
    }

    /// Enables server-side session recording.
    pub fn with_recording(self, recording: bool) -> Self {
        self.with_extra("recording", Value::Bool(recording))
    }

    /// Synchronizes the host clipboard with the remote application.
    pub fn with_sync_clipboard(self, sync: bool) -> Self {
        self.with_extra("syncClipboard", Value::Bool(sync))
    }

    /// Removes the logout button from the client library's dialogs.
    pub fn with_disable_logout(self, disable: bool) -> Self {
        self.with_extra("disableLogout", Value::Bool(disable))
    }

    /// Disables the client library's login process entirely.
    pub fn with_disable_login(self, disable: bool) -> Self {
        self.with_extra("disableLogin", Value::Bool(disable))
    }

    /// Sets an arbitrary client-library option by key.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

impl fmt::Debug for ConnectorOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorOptions")
            .field("connection_url", &self.connection_url)
            .field("auto_start", &self.auto_start)
            .field("on_start", &self.on_start.as_ref().map(|_| "<hook>"))
            .field("extra", &self.extra)
            .finish()
    }
}

/// The fully merged options handed to `StreamClient::bootstrap`.
#[derive(Clone)]
pub struct SessionOptions {
    /// URL the streaming session connects to.
    pub connection_url: String,
    /// Whether the client library starts the session right after bootstrap.
    pub auto_start: bool,
    /// Invoked by the client library when the session starts.
    pub on_start: StartHook,
    /// Free-form options passed through to the client library.
    pub extra: Map<String, Value>,
}

impl SessionOptions {
    /// The connector defaults: connect to `url`, do not auto-start, and
    /// report session start through `on_start`.
    pub fn defaults(url: impl Into<String>, on_start: StartHook) -> Self {
        Self {
            connection_url: url.into(),
            auto_start: false,
            on_start,
            extra: Map::new(),
        }
    }

    /// Applies a caller overlay on top of these options, last-write-wins.
    ///
    /// Keys the overlay leaves unset retain their current values; `extra`
    /// keys are shallow-merged with overlay keys replacing existing ones.
    pub fn merged_with(mut self, overlay: &ConnectorOptions) -> Self {
        if let Some(url) = &overlay.connection_url {
            self.connection_url = url.clone();
        }
        if let Some(auto_start) = overlay.auto_start {
            self.auto_start = auto_start;
        }
        if let Some(hook) = &overlay.on_start {
            self.on_start = Arc::clone(hook);
        }
        for (key, value) in &overlay.extra {
            self.extra.insert(key.clone(), value.clone());
        }
        self
    }
}

impl fmt::Debug for SessionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionOptions")
            .field("connection_url", &self.connection_url)
            .field("auto_start", &self.auto_start)
            .field("on_start", &"<hook>")
            .field("extra", &self.extra)
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn noop_hook() -> StartHook {
        Arc::new(|| {})
    }

    #[test]
    fn test_defaults_disable_auto_start() {
        // Arrange / Act
        let options = SessionOptions::defaults("http://localhost:8080/app", noop_hook());

        // Assert
        assert_eq!(options.connection_url, "http://localhost:8080/app");
        assert!(!options.auto_start);
        assert!(options.extra.is_empty());
    }

    #[test]
    fn test_unset_overlay_fields_retain_defaults() {
        let merged = SessionOptions::defaults("http://localhost/app", noop_hook())
            .merged_with(&ConnectorOptions::new());

        assert_eq!(merged.connection_url, "http://localhost/app");
        assert!(!merged.auto_start);
    }

    #[test]
    fn test_overlay_fields_win_over_defaults() {
        let overlay = ConnectorOptions::new()
            .with_connection_url("http://other-host/app")
            .with_auto_start(true);

        let merged =
            SessionOptions::defaults("http://localhost/app", noop_hook()).merged_with(&overlay);

        assert_eq!(merged.connection_url, "http://other-host/app");
        assert!(merged.auto_start);
    }

    #[test]
    fn test_overlay_start_hook_replaces_default() {
        // Arrange: a counting hook so we can observe which one runs.
        let calls = Arc::new(AtomicUsize::new(0));
        let observed = Arc::clone(&calls);
        let overlay = ConnectorOptions::new()
            .with_on_start(Arc::new(move || {
                observed.fetch_add(1, Ordering::SeqCst);
            }));

        // Act
        let merged =
            SessionOptions::defaults("http://localhost/app", noop_hook()).merged_with(&overlay);
        (merged.on_start)();

        // Assert
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_well_known_keys_use_client_library_spellings() {
        let overlay = ConnectorOptions::new()
            .with_auto_reconnect(3000)
            .with_security_token("secret")
            .with_realm("customers")
            .with_args("--fullscreen")
            .with_recording(true)
            .with_sync_clipboard(true)
            .with_disable_login(true)
            .with_disable_logout(false);

        let merged =
            SessionOptions::defaults("http://localhost/app", noop_hook()).merged_with(&overlay);

        assert_eq!(merged.extra["autoReconnect"], 3000);
        assert_eq!(merged.extra["securityToken"], "secret");
        assert_eq!(merged.extra["realm"], "customers");
        assert_eq!(merged.extra["args"], "--fullscreen");
        assert_eq!(merged.extra["recording"], true);
        assert_eq!(merged.extra["syncClipboard"], true);
        assert_eq!(merged.extra["disableLogin"], true);
        assert_eq!(merged.extra["disableLogout"], false);
    }

    #[test]
    fn test_extra_keys_shallow_merge_with_overlay_winning() {
        let mut base = SessionOptions::defaults("http://localhost/app", noop_hook());
        base.extra
            .insert("recording".to_string(), Value::Bool(false));
        base.extra
            .insert("realm".to_string(), Value::String("default".to_string()));

        let overlay = ConnectorOptions::new().with_recording(true);
        let merged = base.merged_with(&overlay);

        // Overlay key replaces, untouched key survives.
        assert_eq!(merged.extra["recording"], true);
        assert_eq!(merged.extra["realm"], "default");
    }
}
