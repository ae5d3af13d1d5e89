//! Pagination store owning the accumulated collection.
//!
//! The collection lives behind an `Arc<RwLock<Arc<Vec<MediaItem>>>>`. Writers
//! mutate it under the write lock with `Arc::make_mut`, so a page is applied
//! atomically: readers either see the collection before the page or after it,
//! never half of it. A [`Snapshot`] is just a clone of the inner `Arc`, which
//! keeps it stable for as long as the reader holds it even if the store moves
//! on (the next write then copies instead of mutating in place).
//!
//! Only the session writes. The UI gets a [`StoreReader`], which can take
//! snapshots from any thread but has no mutating methods.

use crate::domain::MediaItem;
use std::ops::Deref;
use std::sync::{Arc, PoisonError, RwLock};

type Shared = Arc<RwLock<Arc<Vec<MediaItem>>>>;

/// Owner of the ordered item collection.
#[derive(Debug, Default)]
pub struct PaginationStore {
    items: Shared,
}

impl PaginationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection with `items`.
    pub fn reset(&mut self, items: Vec<MediaItem>) {
        let count = items.len();
        let mut guard = self.items.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(items);
        drop(guard);

        tracing::debug!(count, "collection reset");
    }

    /// Appends `items` to the end of the collection, preserving their order.
    ///
    /// Appending an empty page is valid and leaves the collection unchanged.
    pub fn append(&mut self, items: Vec<MediaItem>) {
        if items.is_empty() {
            tracing::trace!("append with empty page");
            return;
        }

        let count = items.len();
        let mut guard = self.items.write().unwrap_or_else(PoisonError::into_inner);
        Arc::make_mut(&mut *guard).extend(items);
        let total = guard.len();
        drop(guard);

        tracing::debug!(count, total, "items appended");
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// A consistent point-in-time view of the collection.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(self.read())
    }

    /// A read-only handle for consumers outside the session.
    #[must_use]
    pub fn reader(&self) -> StoreReader {
        StoreReader {
            items: Arc::clone(&self.items),
        }
    }

    fn read(&self) -> Arc<Vec<MediaItem>> {
        Arc::clone(&self.items.read().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Read-only access to a [`PaginationStore`], safe to use from other threads.
#[derive(Debug, Clone)]
pub struct StoreReader {
    items: Shared,
}

impl StoreReader {
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot(Arc::clone(
            &self.items.read().unwrap_or_else(PoisonError::into_inner),
        ))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Immutable view of the collection at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot(Arc<Vec<MediaItem>>);

impl Snapshot {
    /// The last `count` items, i.e. the ones announced by an `Appended` event.
    #[must_use]
    pub fn tail(&self, count: usize) -> &[MediaItem] {
        &self.0[self.0.len().saturating_sub(count)..]
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<MediaItem> {
        self.0.as_ref().clone()
    }
}

impl Deref for Snapshot {
    type Target = [MediaItem];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
