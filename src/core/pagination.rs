use crate::core::client::RawgClient;
use crate::core::url::build_url;
use crate::domain::model::Page;
use crate::domain::ports::HttpBackend;
use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use url::Url;

/// Hard cap on pages fetched by a single pager.
pub const MAX_PAGES: usize = 100;

/// Walks a RAWG list by following its `next` links.
pub struct Pager<'a, B: HttpBackend, T> {
    client: &'a RawgClient<B>,
    next: Option<Url>,
    pages_fetched: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, B: HttpBackend, T: DeserializeOwned + Send> Pager<'a, B, T> {
    pub(crate) fn new(
        client: &'a RawgClient<B>,
        segments: &[&str],
        pairs: &[(&'static str, String)],
    ) -> Result<Self> {
        let first = build_url(client.config(), segments, pairs)?;
        Ok(Self {
            client,
            next: Some(first),
            pages_fetched: 0,
            _marker: PhantomData,
        })
    }

    /// `Ok(None)` once the last page was returned or the cap is reached.
    pub async fn next_page(&mut self) -> Result<Option<Page<T>>> {
        if self.pages_fetched >= MAX_PAGES {
            if self.next.is_some() {
                tracing::warn!(max_pages = MAX_PAGES, "Stopping pagination at page cap");
            }
            return Ok(None);
        }
        let Some(url) = self.next.take() else {
            return Ok(None);
        };

        let page: Page<T> = self.client.backend().get_json(&url).await?;
        self.pages_fetched += 1;
        self.next = page
            .next
            .as_deref()
            .map(|next| self.client.resolve_next(next))
            .transpose()?;

        tracing::debug!(
            page = self.pages_fetched,
            results = page.results.len(),
            total = page.count,
            has_next = self.next.is_some(),
            "Fetched page"
        );
        Ok(Some(page))
    }

    /// Concatenates results of at most `max_pages` pages.
    pub async fn collect_all(mut self, max_pages: usize) -> Result<Vec<T>> {
        let limit = max_pages.min(MAX_PAGES);
        let mut items = Vec::new();
        while self.pages_fetched < limit {
            match self.next_page().await? {
                Some(page) => items.extend(page.results),
                None => break,
            }
        }
        Ok(items)
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn is_exhausted(&self) -> bool {
        self.next.is_none()
    }
}
