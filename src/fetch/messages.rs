//! Request and completion types exchanged with the media source.
//!
//! A [`PageRequest`] is what the media source sees. The [`FetchTicket`] stays
//! on the coordinator side: it records why the request was made (refresh or
//! append), under which mode, and which generation it belongs to. The two are
//! reunited in a [`PageCompletion`] when the source answers.

use crate::domain::{FeedError, MediaItem, Mode};

/// One paged query against the media source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub mode: Mode,
    /// Number of items already held; the first item wanted.
    pub offset: usize,
    pub page_size: usize,
}

/// Why a page was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First page; replaces the collection.
    Refresh,

    /// Next page; appended to the collection.
    More,
}

/// Coordinator-side identity of a dispatched request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Monotonically increasing per session; only the latest is applied.
    pub generation: u64,
    pub kind: FetchKind,
    /// Mode that was active when the request was built.
    pub mode: Mode,
}

/// Outcome of one page request. A page is all-or-nothing.
pub type PageResult = std::result::Result<Vec<MediaItem>, FeedError>;

/// A finished request, ready to re-enter the state machine.
#[derive(Debug)]
pub struct PageCompletion {
    pub ticket: FetchTicket,
    pub result: PageResult,
}

impl PageCompletion {
    #[must_use]
    pub const fn new(ticket: FetchTicket, result: PageResult) -> Self {
        Self { ticket, result }
    }
}
