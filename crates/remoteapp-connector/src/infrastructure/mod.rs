//! Infrastructure layer: concrete adapters behind the application seams.
//!
//! - **`channel_host`** – A [`HostElement`](crate::application::host::HostElement)
//!   that forwards connector events into a tokio channel, for embedders
//!   that consume events as an async stream.
//! - **`mock`** – In-memory recording doubles for the streaming-library
//!   seam and the host seam, used by unit and integration tests.

pub mod channel_host;
pub mod mock;
