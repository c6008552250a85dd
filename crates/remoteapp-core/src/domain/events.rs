//! Events emitted by the connector toward its host.
//!
//! The connector translates session lifecycle and server-initiated action
//! callbacks into [`ConnectorEvent`]s.  In a web host these surface as
//! bubbling, composed custom events; how they are delivered is the host
//! element's concern, not this crate's.
//!
//! # JSON shadow
//!
//! Web hosts consume events as JSON, so every event serializes to an object
//! with a `"type"` discriminant and camelCase fields, e.g.:
//!
//! ```json
//! {"type":"Initialized"}
//! {"type":"Started"}
//! {"type":"Action","actionName":"export","data":"csv","binaryDataBase64":"QUI="}
//! ```
//!
//! Serde's `#[serde(tag = "type")]` attribute handles the discriminant.

use serde::{Deserialize, Serialize};

/// All events the connector can dispatch to its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConnectorEvent {
    /// The session handle was created and the action hook installed.
    ///
    /// Fired once per successful initialization, deferred to the next frame
    /// opportunity so the host sees the session's first rendered state.
    Initialized,

    /// The underlying session's own start callback fired.
    ///
    /// With `auto_start` disabled this follows a successful `start()` call;
    /// with `auto_start` enabled the client library starts the session
    /// itself and this fires without any host involvement.
    Started,

    /// The remote application signalled a server-side action.
    Action(ActionEvent),
}

/// Detail carried by [`ConnectorEvent::Action`].
///
/// The binary payload arrives from the session as raw bytes and is
/// transcoded to Base64 before dispatch (see [`crate::transcode`]); a
/// payload that fails the transcode is dropped from the event, not the
/// event itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionEvent {
    /// The name of the action the server performed.
    pub action_name: String,
    /// Optional textual data sent with the action.
    pub data: Option<String>,
    /// Optional binary data sent with the action, Base64-encoded.
    pub binary_data_base64: Option<String>,
}
