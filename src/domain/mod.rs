//! Domain layer for the media feed.
//!
//! This module contains the core value types shared by every other layer,
//! independent of the async runtime, the remote API, or the UI.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`item`]: Media record model
//! - [`mode`]: Trending / search browsing mode
//!
//! # Examples
//!
//! ```
//! use mediafeed::domain::{MediaItem, Mode, Result};
//!
//! fn first_page() -> Result<(Mode, Vec<MediaItem>)> {
//!     Ok((Mode::Trending, vec![MediaItem::new("id", "https://m/id.gif", 200, 200)]))
//! }
//! # first_page().unwrap();
//! ```

pub mod error;
pub mod item;
pub mod mode;

pub use error::{FeedError, Result};
pub use item::MediaItem;
pub use mode::Mode;
