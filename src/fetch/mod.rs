//! Fetch layer: the boundary with the media source and the async runtime
//! that drives a session.
//!
//! # Architecture
//!
//! - `messages`: Page request / ticket / completion types
//! - `port`: The [`MediaFetchPort`] trait implemented by media sources
//! - `coordinator`: [`FetchCoordinator`] task and the [`SessionHandle`] used by UIs
//! - `giphy`: Giphy URL building and response decoding over a host transport

pub mod coordinator;
pub mod giphy;
pub mod messages;
pub mod port;

pub use coordinator::{FetchCoordinator, SessionHandle};
pub use giphy::{decode_list_response, GiphyEndpoint, GiphyPort, HttpTransport};
pub use messages::{FetchKind, FetchTicket, PageCompletion, PageRequest, PageResult};
pub use port::MediaFetchPort;
