//! Giphy-backed media source.
//!
//! Builds trending and search URLs for the Giphy REST API and decodes its list
//! responses into [`MediaItem`]s. The HTTP call itself is delegated to an
//! [`HttpTransport`] supplied by the host application, so this module has no
//! network dependency of its own.
//!
//! # Response Format
//!
//! ```json
//! {
//!   "data": [
//!     {
//!       "id": "xT9IgG50Fb7Mi0prBC",
//!       "title": "cat typing",
//!       "url": "https://giphy.com/gifs/xT9IgG50Fb7Mi0prBC",
//!       "images": {
//!         "fixed_width": { "url": "https://media.giphy.com/...", "width": "200", "height": "150" }
//!       }
//!     }
//!   ],
//!   "meta": { "status": 200, "msg": "OK" }
//! }
//! ```

use super::messages::{PageRequest, PageResult};
use super::port::MediaFetchPort;
use crate::domain::{FeedError, MediaItem, Mode, Result};
use crate::Config;
use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::Deserialize;
use std::sync::Arc;

/// Giphy GIF API root.
pub const DEFAULT_BASE_URL: &str = "https://api.giphy.com/v1/gifs";

/// Performs an HTTP GET and yields the response body.
///
/// Implemented by the host application with whatever HTTP client it already
/// uses. Non-success statuses should be reported as errors.
pub trait HttpTransport: Send + Sync + 'static {
    fn get(&self, url: String) -> BoxFuture<'static, Result<String>>;
}

/// URL builder for the trending and search endpoints.
#[derive(Clone)]
pub struct GiphyEndpoint {
    base_url: String,
    api_key: String,
    rating: String,
}

impl GiphyEndpoint {
    pub fn new(api_key: impl Into<String>, rating: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            rating: rating.into(),
        }
    }

    /// Builds an endpoint from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::Config`] when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| FeedError::Config("missing api_key".to_string()))?;
        Ok(Self::new(api_key, config.rating.clone()))
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Full request URL for `request`.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediafeed::fetch::{GiphyEndpoint, PageRequest};
    /// use mediafeed::Mode;
    ///
    /// let endpoint = GiphyEndpoint::new("KEY", "g");
    /// let url = endpoint.url_for(&PageRequest {
    ///     mode: Mode::search("funny cats").unwrap(),
    ///     offset: 25,
    ///     page_size: 25,
    /// });
    /// assert_eq!(
    ///     url,
    ///     "https://api.giphy.com/v1/gifs/search?api_key=KEY&q=funny%20cats&limit=25&offset=25&rating=g"
    /// );
    /// ```
    #[must_use]
    pub fn url_for(&self, request: &PageRequest) -> String {
        let key = percent_encode(&self.api_key);
        let paging = format!(
            "limit={}&offset={}&rating={}",
            request.page_size,
            request.offset,
            percent_encode(&self.rating)
        );

        match &request.mode {
            Mode::Trending => format!("{}/trending?api_key={key}&{paging}", self.base_url),
            Mode::Search { query } => format!(
                "{}/search?api_key={key}&q={}&{paging}",
                self.base_url,
                percent_encode(query)
            ),
        }
    }
}

impl std::fmt::Debug for GiphyEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GiphyEndpoint")
            .field("base_url", &self.base_url)
            .field("rating", &self.rating)
            .finish_non_exhaustive()
    }
}

/// [`MediaFetchPort`] talking to Giphy through an [`HttpTransport`].
pub struct GiphyPort<T> {
    endpoint: GiphyEndpoint,
    transport: Arc<T>,
}

impl<T: HttpTransport> GiphyPort<T> {
    pub fn new(endpoint: GiphyEndpoint, transport: T) -> Self {
        Self {
            endpoint,
            transport: Arc::new(transport),
        }
    }
}

impl<T: HttpTransport> MediaFetchPort for GiphyPort<T> {
    fn fetch_page(&self, request: PageRequest) -> BoxFuture<'static, PageResult> {
        tracing::debug!(
            mode = %request.mode,
            offset = request.offset,
            limit = request.page_size,
            "requesting giphy page"
        );

        let body = self.transport.get(self.endpoint.url_for(&request));

        async move {
            let body = body.await.map_err(|e| match e {
                FeedError::FetchFailed(_) => e,
                other => FeedError::FetchFailed(other.to_string()),
            })?;
            decode_list_response(&body)
        }
        .boxed()
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    data: Option<Vec<GifObject>>,
    #[serde(default)]
    meta: Option<Meta>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    status: u16,
    #[serde(default)]
    msg: String,
}

#[derive(Debug, Deserialize)]
struct GifObject {
    id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    images: Option<Images>,
}

#[derive(Debug, Deserialize)]
struct Images {
    fixed_width: Option<Rendition>,
    original: Option<Rendition>,
}

#[derive(Debug, Deserialize)]
struct Rendition {
    url: Option<String>,
    #[serde(default)]
    width: Option<String>,
    #[serde(default)]
    height: Option<String>,
}

impl GifObject {
    fn into_item(self) -> Option<MediaItem> {
        let images = self.images?;
        let rendition = images
            .fixed_width
            .filter(|r| r.url.is_some())
            .or(images.original)?;
        let display_url = rendition.url?;

        let dimension = |value: Option<String>| {
            value
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(0)
        };

        Some(MediaItem {
            id: self.id,
            display_url,
            width: dimension(rendition.width),
            height: dimension(rendition.height),
            title: self.title.filter(|t| !t.is_empty()),
            page_url: self.url,
        })
    }
}

/// Decodes a Giphy list response body.
///
/// # Errors
///
/// Returns [`FeedError::FetchFailed`] when the body is not valid JSON, when
/// `meta.status` is not 200, when `data` is missing, or when any item lacks a
/// usable image. A page is all-or-nothing: the next offset is the number of
/// items stored, so a dropped item would shift every later page.
pub fn decode_list_response(body: &str) -> PageResult {
    let response: ListResponse = serde_json::from_str(body)
        .map_err(|e| FeedError::FetchFailed(format!("invalid giphy response: {e}")))?;

    if let Some(meta) = response.meta.as_ref().filter(|m| m.status != 200) {
        return Err(FeedError::FetchFailed(format!(
            "giphy status {}: {}",
            meta.status, meta.msg
        )));
    }

    let data = response
        .data
        .ok_or_else(|| FeedError::FetchFailed("giphy response has no data".to_string()))?;

    let mut items = Vec::with_capacity(data.len());
    for object in data {
        let id = object.id.clone();
        let item = object.into_item().ok_or_else(|| {
            tracing::debug!(id = %id, "giphy item without a usable image");
            FeedError::FetchFailed(format!("giphy item {id} has no usable image"))
        })?;
        items.push(item);
    }

    Ok(items)
}

/// Percent-encodes a query string component (RFC 3986 unreserved set kept).
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &b in input.as_bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(b as char);
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{b:02X}"));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{handle_event, Action, ChangeEvent, Event, Session};
    use crate::fetch::PageCompletion;
    use std::sync::Mutex;

    const PAGE: &str = r#"{
        "data": [
            {
                "id": "one",
                "title": "First",
                "url": "https://giphy.com/gifs/one",
                "images": {
                    "fixed_width": { "url": "https://media/one.gif", "width": "200", "height": "150" },
                    "original": { "url": "https://media/one-big.gif", "width": "480", "height": "360" }
                }
            },
            {
                "id": "two",
                "title": "",
                "images": {
                    "original": { "url": "https://media/two.gif", "width": "480", "height": "nan" }
                }
            }
        ],
        "pagination": { "total_count": 2, "count": 2, "offset": 0 },
        "meta": { "status": 200, "msg": "OK" }
    }"#;

    struct RecordingTransport {
        urls: Arc<Mutex<Vec<String>>>,
        reply: std::result::Result<&'static str, &'static str>,
    }

    impl HttpTransport for RecordingTransport {
        fn get(&self, url: String) -> BoxFuture<'static, Result<String>> {
            self.urls.lock().unwrap().push(url);
            let reply = self.reply;
            async move {
                match reply {
                    Ok(body) => Ok(body.to_string()),
                    Err(e) => Err(FeedError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))),
                }
            }
            .boxed()
        }
    }

    fn request(mode: Mode, offset: usize) -> PageRequest {
        PageRequest {
            mode,
            offset,
            page_size: 25,
        }
    }

    #[test]
    fn decodes_items() {
        let items = decode_list_response(PAGE).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "one");
        assert_eq!(items[0].display_url, "https://media/one.gif");
        assert_eq!((items[0].width, items[0].height), (200, 150));
        assert_eq!(items[0].title.as_deref(), Some("First"));
        assert_eq!(items[0].page_url.as_deref(), Some("https://giphy.com/gifs/one"));

        assert_eq!(items[1].display_url, "https://media/two.gif");
        assert_eq!((items[1].width, items[1].height), (480, 0));
        assert!(items[1].title.is_none());
    }

    #[test]
    fn error_status_is_a_failure() {
        let body = r#"{ "data": [], "meta": { "status": 403, "msg": "Forbidden" } }"#;
        let err = decode_list_response(body).unwrap_err();
        assert_eq!(err.to_string(), "Fetch failed: giphy status 403: Forbidden");
    }

    #[test]
    fn missing_data_and_bad_json_are_failures() {
        assert!(decode_list_response(r#"{ "meta": { "status": 200 } }"#)
            .unwrap_err()
            .is_fetch_failure());
        assert!(decode_list_response("<html>").unwrap_err().is_fetch_failure());
    }

    #[test]
    fn empty_page_is_ok() {
        assert!(decode_list_response(r#"{ "data": [] }"#).unwrap().is_empty());
    }

    #[test]
    fn one_unusable_item_fails_the_whole_page() {
        let body = r#"{
            "data": [
                { "id": "a", "images": { "fixed_width": { "url": "https://media/a.gif" } } },
                { "id": "broken" },
                { "id": "c", "images": { "fixed_width": { "url": "https://media/c.gif" } } }
            ],
            "meta": { "status": 200, "msg": "OK" }
        }"#;

        let result = decode_list_response(body);
        let err = result.as_ref().unwrap_err();
        assert!(err.is_fetch_failure());
        assert!(err.to_string().contains("broken"));

        // Fed through the session, the page leaves the offset untouched.
        let mut session = Session::new(3);
        let actions = handle_event(&mut session, Event::RequestRefresh);
        let Some(Action::Dispatch { ticket, .. }) = actions.into_iter().next() else {
            panic!("refresh should dispatch");
        };
        let actions = handle_event(
            &mut session,
            Event::PageLoaded(PageCompletion::new(ticket, result)),
        );
        assert_eq!(actions, vec![Action::Notify(ChangeEvent::Failed)]);
        assert!(session.store().is_empty());

        let actions = handle_event(&mut session, Event::RequestMore);
        let Some(Action::Dispatch { request, .. }) = actions.into_iter().next() else {
            panic!("more should dispatch");
        };
        assert_eq!(request.offset, 0);
    }

    #[test]
    fn trending_url() {
        let endpoint = GiphyEndpoint::new("k", "pg-13").with_base_url("http://localhost:8080/v1/gifs/");
        assert_eq!(
            endpoint.url_for(&request(Mode::Trending, 50)),
            "http://localhost:8080/v1/gifs/trending?api_key=k&limit=25&offset=50&rating=pg-13"
        );
    }

    #[test]
    fn search_query_is_encoded() {
        let endpoint = GiphyEndpoint::new("k", "g");
        let url = endpoint.url_for(&request(Mode::search("a&b=c").unwrap(), 0));
        assert!(url.contains("q=a%26b%3Dc&"));
    }

    #[test]
    fn endpoint_requires_api_key() {
        let err = GiphyEndpoint::from_config(&Config::default()).unwrap_err();
        assert!(matches!(err, FeedError::Config(_)));

        let config = Config {
            api_key: Some("secret".into()),
            ..Config::default()
        };
        let endpoint = GiphyEndpoint::from_config(&config).unwrap();
        assert!(!format!("{endpoint:?}").contains("secret"));
    }

    #[tokio::test]
    async fn port_fetches_and_decodes() {
        let urls = Arc::new(Mutex::new(Vec::new()));
        let port = GiphyPort::new(
            GiphyEndpoint::new("k", "g"),
            RecordingTransport {
                urls: Arc::clone(&urls),
                reply: Ok(PAGE),
            },
        );

        let items = port.fetch_page(request(Mode::search("cats").unwrap(), 25)).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(urls.lock().unwrap()[0].contains("/search?api_key=k&q=cats&limit=25&offset=25"));
    }

    #[tokio::test]
    async fn transport_errors_become_fetch_failures() {
        let port = GiphyPort::new(
            GiphyEndpoint::new("k", "g"),
            RecordingTransport {
                urls: Arc::new(Mutex::new(Vec::new())),
                reply: Err("connection refused"),
            },
        );

        let err = port.fetch_page(request(Mode::Trending, 0)).await.unwrap_err();
        assert!(err.is_fetch_failure());
        assert!(err.to_string().contains("connection refused"));
    }
}
