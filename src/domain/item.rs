//! Media item domain model.
//!
//! A [`MediaItem`] is the opaque record held in the feed collection. The core
//! only relies on its identity and display geometry; everything else is carried
//! through for the rendering layer.

use serde::{Deserialize, Serialize};

/// A single media record returned by the remote source.
///
/// Identity is by `id`. No uniqueness is enforced across pages: if the source
/// returns the same item twice, both copies are kept in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub display_url: String,
    pub width: u32,
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

impl MediaItem {
    /// Creates an item with the required fields only.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediafeed::MediaItem;
    ///
    /// let item = MediaItem::new("abc", "https://media.example/abc.gif", 200, 150);
    /// assert_eq!(item.id, "abc");
    /// assert!(item.title.is_none());
    /// ```
    pub fn new(id: impl Into<String>, display_url: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            display_url: display_url.into(),
            width,
            height,
            title: None,
            page_url: None,
        }
    }

    /// Height-over-width ratio, used by grid cells to reserve space before the
    /// image is decoded. Returns `1.0` for degenerate geometry.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.height as f32 / self.width as f32;
        ratio
    }
}
