//! Domain types for the remote-app connector.
//!
//! - **`action`** – Payloads travelling host → server (`ActionRequest`) and
//!   the mount node a session renders into.
//! - **`events`** – Events travelling server/session → host
//!   (`ConnectorEvent`), with a JSON shadow for web hosts.
//! - **`options`** – The caller-supplied options overlay and the merged
//!   session options handed to the streaming client at bootstrap.

pub mod action;
pub mod events;
pub mod options;
