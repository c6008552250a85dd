//! # remoteapp-core
//!
//! Shared library for the remote-app connector containing the domain types,
//! the session options model, the Base64 payload transcoding utilities, and
//! the initialization-generation counter.
//!
//! This crate is used by the connector component and by host applications
//! that consume its events.  It has zero dependencies on async runtimes,
//! sockets, or UI frameworks.
//!
//! # Architecture overview
//!
//! A *remote app* is a desktop-GUI program running on a server and rendered
//! in the host page by a third-party screen-streaming client library.  The
//! connector component (in `remoteapp-connector`) manages the lifecycle of
//! one streaming session: resolve the client library, bootstrap a session
//! into a mount node, forward host-triggered actions to the server, and
//! relay server-initiated events back to the host.
//!
//! This crate (`remoteapp-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – Connector events, action payloads, mount nodes, and the
//!   options model with its defaults-plus-overlay merge.
//!
//! - **`transcode`** – The Base64 transcoding applied to binary action
//!   payloads on their way in and out of the session.
//!
//! - **`generation`** – A monotonically increasing counter used to discard
//!   results of superseded initialization attempts.

pub mod domain;
pub mod generation;
pub mod transcode;

// Re-export the most-used types at the crate root so callers can write
// `remoteapp_core::ConnectorEvent` instead of the full module path.
pub use domain::action::{ActionRequest, MountNode};
pub use domain::events::{ActionEvent, ConnectorEvent};
pub use domain::options::{ConnectorOptions, SessionOptions, StartHook};
pub use generation::InitGeneration;
pub use transcode::{decode_binary, encode_binary, TranscodeError};
