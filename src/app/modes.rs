//! Mode controller holding the active browsing mode.
//!
//! The controller is a plain owned value inside the session. Switching modes
//! only stores the new mode; it never touches the collection. Callers that
//! switch modes are expected to follow up with a refresh (the event handler
//! does this for `ShowTrending` / `ShowSearch`).
//!
//! # Example
//!
//! ```rust
//! use mediafeed::app::ModeController;
//! use mediafeed::Mode;
//!
//! let mut modes = ModeController::default();
//! assert!(modes.set_search("cats"));
//! assert!(!modes.set_search(""));
//! assert_eq!(modes.current_mode().query(), Some("cats"));
//! ```

use crate::domain::Mode;

/// Holds the single active [`Mode`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self { mode }
    }

    /// Switches to the trending feed.
    pub fn set_trending(&mut self) {
        tracing::debug!(previous = %self.mode, "mode set to trending");
        self.mode = Mode::Trending;
    }

    /// Switches to a search for `query`.
    ///
    /// Returns `false` and leaves the mode untouched when `query` is empty or
    /// whitespace-only.
    pub fn set_search(&mut self, query: &str) -> bool {
        let Some(mode) = Mode::search(query) else {
            tracing::debug!("rejected empty search query");
            return false;
        };

        tracing::debug!(previous = %self.mode, next = %mode, "mode set to search");
        self.mode = mode;
        true
    }

    #[must_use]
    pub const fn current_mode(&self) -> &Mode {
        &self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_trending() {
        assert_eq!(ModeController::default().current_mode(), &Mode::Trending);
    }

    #[test]
    fn empty_query_keeps_previous_mode() {
        let mut modes = ModeController::default();
        assert!(modes.set_search("cats"));
        assert!(!modes.set_search(""));
        assert!(!modes.set_search(" \t"));
        assert_eq!(modes.current_mode(), &Mode::search("cats").unwrap());
    }

    #[test]
    fn back_to_trending() {
        let mut modes = ModeController::new(Mode::search("cats").unwrap());
        modes.set_trending();
        assert!(modes.current_mode().is_trending());
    }
}
