//! Boundary with the remote media source.
//!
//! The coordinator only needs one capability from the outside world: turn a
//! [`PageRequest`] into a page of items, eventually. Transport, auth and
//! response decoding all live behind this trait.

use super::messages::{PageRequest, PageResult};
use futures_util::future::BoxFuture;
use std::sync::Arc;

/// Performs one paged trending or search query.
///
/// The returned future may be polled on any thread; the coordinator marshals
/// its output back onto the session task before touching state. A single
/// attempt is made per call: implementations must not retry on their own.
pub trait MediaFetchPort: Send + Sync + 'static {
    fn fetch_page(&self, request: PageRequest) -> BoxFuture<'static, PageResult>;
}

impl<P: MediaFetchPort + ?Sized> MediaFetchPort for Arc<P> {
    fn fetch_page(&self, request: PageRequest) -> BoxFuture<'static, PageResult> {
        (**self).fetch_page(request)
    }
}

impl<P: MediaFetchPort + ?Sized> MediaFetchPort for Box<P> {
    fn fetch_page(&self, request: PageRequest) -> BoxFuture<'static, PageResult> {
        (**self).fetch_page(request)
    }
}
