//! Host → server action payloads and the session mount point.

/// An action forwarded to the server-side application.
///
/// Produced by the connector's `perform_action` after Base64-decoding the
/// optional binary payload; consumed by the session handle, which carries it
/// over the streaming protocol.  `binary_data` is `None` when the caller
/// supplied no payload — the session must not receive an empty placeholder
/// in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    /// The name the server-side listener is registered under.
    pub action_name: String,
    /// Optional textual data sent with the action.
    pub data: Option<String>,
    /// Optional raw binary data sent with the action.
    pub binary_data: Option<Vec<u8>>,
}

/// Identifies the child node of the host element that a streaming session
/// renders into.
///
/// The connector does not interpret the identifier; it is handed verbatim to
/// `StreamClient::bootstrap`, which resolves it against whatever rendering
/// surface the client library targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountNode {
    id: String,
}

impl MountNode {
    /// Creates a mount node with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    /// The identifier of the render target.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Default for MountNode {
    /// The conventional render-root child created by the connector.
    fn default() -> Self {
        Self::new("remoteapp-root")
    }
}
