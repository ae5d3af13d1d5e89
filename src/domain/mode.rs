//! Browsing mode domain type.
//!
//! The feed is always in exactly one mode: the global trending feed, or a
//! search for a non-empty query. The mode decides which endpoint the media
//! source queries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which logical feed is active.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Global trending results.
    #[default]
    Trending,

    /// Results for a search query. The query is never empty.
    Search {
        query: String,
    },
}

impl Mode {
    /// Builds a search mode, rejecting empty or whitespace-only queries.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediafeed::Mode;
    ///
    /// assert_eq!(
    ///     Mode::search("cats"),
    ///     Some(Mode::Search { query: "cats".to_string() })
    /// );
    /// assert_eq!(Mode::search("   "), None);
    /// ```
    pub fn search(query: impl Into<String>) -> Option<Self> {
        let query = query.into();
        if query.trim().is_empty() {
            None
        } else {
            Some(Self::Search { query })
        }
    }

    #[must_use]
    pub const fn is_trending(&self) -> bool {
        matches!(self, Self::Trending)
    }

    #[must_use]
    pub const fn is_search(&self) -> bool {
        matches!(self, Self::Search { .. })
    }

    /// The active search query, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        match self {
            Self::Trending => None,
            Self::Search { query } => Some(query),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trending => f.write_str("Trending"),
            Self::Search { query } => write!(f, "Search, query:{query}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_log_format() {
        assert_eq!(Mode::Trending.to_string(), "Trending");
        assert_eq!(
            Mode::search("dogs").unwrap().to_string(),
            "Search, query:dogs"
        );
    }

    #[test]
    fn query_accessor() {
        assert_eq!(Mode::Trending.query(), None);
        assert_eq!(Mode::search("x").unwrap().query(), Some("x"));
        assert!(Mode::default().is_trending());
    }
}
