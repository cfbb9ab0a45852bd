//! Offset pagination over `{count, next, previous, results}` list endpoints.
//!
//! The server builds `next` from the host it sees, which behind a reverse
//! proxy is not the host the client talks to. [`resolve_next_url`] keeps the
//! configured API root and only borrows the query from `next`.

use std::collections::VecDeque;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::session::ApiClient;

/// One page of a paginated list.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// Rebuild the server-supplied `next` URL against the configured API root.
///
/// The resource token is `initial_url` minus `api_url`, without its query.
/// When `next` contains the token exactly once, the result is
/// `api_url + token + <rest of next>`. Otherwise `next` is returned verbatim.
pub fn resolve_next_url(api_url: &str, initial_url: &str, next: Option<&str>) -> Option<String> {
    let next = next?;

    let Some(resource) = initial_url.strip_prefix(api_url) else {
        return Some(next.to_string());
    };
    let token = resource.split('?').next().unwrap_or(resource);
    if token.is_empty() || next.matches(token).count() != 1 {
        return Some(next.to_string());
    }

    match next.split_once(token) {
        Some((_, suffix)) => Some(format!("{api_url}{token}{suffix}")),
        None => Some(next.to_string()),
    }
}

/// Lazily walks every page of a list endpoint.
///
/// Nothing is fetched until the first [`Paginator::try_next`]. Pages are
/// fetched strictly one after another. Once exhausted, or after a page fails,
/// the paginator stays finished.
pub struct Paginator<T> {
    client: ApiClient,
    initial_url: String,
    next_url: Option<String>,
    buffer: VecDeque<T>,
    total: Option<u64>,
    pages: usize,
    finished: bool,
}

impl<T: DeserializeOwned> Paginator<T> {
    pub(crate) fn new(client: ApiClient, resource: &str) -> Self {
        let initial_url = client.url_for(resource);
        Self {
            next_url: Some(initial_url.clone()),
            client,
            initial_url,
            buffer: VecDeque::new(),
            total: None,
            pages: 0,
            finished: false,
        }
    }

    /// Server-reported item count, known after the first page.
    pub fn total_count(&self) -> Option<u64> {
        self.total
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let Some(url) = self.next_url.take() else {
            self.finished = true;
            return Ok(());
        };

        let page: Page<T> = match self.client.get(&url).await {
            Ok(page) => page,
            Err(e) => {
                self.finished = true;
                return Err(e);
            }
        };
        self.pages += 1;
        tracing::debug!(
            "Fetched page {} of {} ({} items)",
            self.pages,
            self.initial_url,
            page.results.len()
        );

        if self.total.is_none() {
            self.total = page.count;
        }
        self.next_url = resolve_next_url(
            self.client.api_url(),
            &self.initial_url,
            page.next.as_deref(),
        );
        self.buffer.extend(page.results);
        Ok(())
    }

    /// Next item in server order, or `None` after the last page.
    pub async fn try_next(&mut self) -> Result<Option<T>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Ok(Some(item));
            }
            if self.finished || self.next_url.is_none() {
                self.finished = true;
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }

    /// Drain every remaining item.
    pub async fn try_collect(mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.try_next().await? {
            items.push(item);
        }
        Ok(items)
    }
}
