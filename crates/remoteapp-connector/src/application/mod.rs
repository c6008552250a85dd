//! Application layer for the connector.
//!
//! - **`connector`** – The `RemoteAppConnector` use case: lifecycle,
//!   initialization, action forwarding, and event translation.
//!
//! - **`session`** – The narrow capability seam over the external streaming
//!   library: resolve a client, bootstrap a session, drive the session
//!   handle.  Concrete bindings and test doubles live in the
//!   infrastructure layer.
//!
//! - **`host`** – The seam toward whatever embeds the connector: event
//!   dispatch, the mount node, display styling, and frame scheduling.

pub mod connector;
pub mod host;
pub mod session;
