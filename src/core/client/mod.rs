//! Typed client for the RAWG API.
//!
//! Endpoint methods live in `games` and `catalog`; this module holds the
//! client itself and the shared request path.

mod catalog;
mod games;

use crate::config::RawgConfig;
use crate::core::http::ReqwestBackend;
use crate::core::url::{build_url, redact};
use crate::domain::model::Page;
use crate::domain::ports::HttpBackend;
use crate::utils::error::{RawgError, Result};
use crate::utils::validation::{self, Validate};
use serde::de::DeserializeOwned;
use url::Url;

/// Client backed by reqwest.
pub type DefaultRawgClient = RawgClient<ReqwestBackend>;

/// RAWG client, generic over the HTTP backend.
///
/// ```no_run
/// # async fn run() -> rawg_client::Result<()> {
/// use rawg_client::{DefaultRawgClient, GamesQuery, RawgConfig};
///
/// let client = DefaultRawgClient::new(RawgConfig::new("my-api-key"))?;
/// let page = client
///     .list_games(&GamesQuery::new().with_search("portal").with_page_size(5))
///     .await?;
/// for game in &page.results {
///     println!("{} ({:?})", game.name, game.released);
/// }
/// # Ok(())
/// # }
/// ```
pub struct RawgClient<B: HttpBackend> {
    backend: B,
    config: RawgConfig,
}

impl DefaultRawgClient {
    pub fn new(config: RawgConfig) -> Result<Self> {
        config.validate()?;
        let backend = ReqwestBackend::new(&config)?;
        Ok(Self { backend, config })
    }

    /// Configured from `RAWG_API_KEY` / `RAWG_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::new(RawgConfig::from_env()?)
    }
}

impl<B: HttpBackend> RawgClient<B> {
    pub fn with_backend(config: RawgConfig, backend: B) -> Result<Self> {
        config.validate()?;
        Ok(Self { backend, config })
    }

    pub fn config(&self) -> &RawgConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub(crate) async fn get<T: DeserializeOwned + Send>(
        &self,
        segments: &[&str],
        pairs: &[(&'static str, String)],
    ) -> Result<T> {
        let url = build_url(&self.config, segments, pairs)?;
        self.backend.get_json(&url).await
    }

    /// Fetches the page after `page`, or `None` on the last page.
    pub async fn follow<T: DeserializeOwned + Send>(
        &self,
        page: &Page<T>,
    ) -> Result<Option<Page<T>>> {
        match &page.next {
            Some(next) => {
                let url = self.resolve_next(next)?;
                self.backend.get_json(&url).await.map(Some)
            }
            None => Ok(None),
        }
    }

    /// Validates a `next` link and makes sure it carries the key.
    ///
    /// Links pointing at another origin are refused so the key is never sent
    /// to a host other than the configured one.
    pub(crate) fn resolve_next(&self, next: &str) -> Result<Url> {
        let base = Url::parse(&self.config.base_url)?;
        let mut url = Url::parse(next)?;

        if url.origin() != base.origin() {
            return Err(RawgError::InvalidResponse {
                message: format!("pagination link points to another host: {}", redact(&url)),
            });
        }

        if !url.query_pairs().any(|(name, _)| name == "key") {
            url.query_pairs_mut().append_pair("key", &self.config.api_key);
        }
        Ok(url)
    }
}

/// Trimmed id or slug for a path segment. Blank values are rejected since they
/// would turn a detail URL into the list URL.
pub(crate) fn path_id(field: &str, value: &str) -> Result<String> {
    validation::validate_non_empty_string(field, value)?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::http::testing::FakeBackend;
    use serde_json::json;

    pub fn test_config() -> RawgConfig {
        RawgConfig::new("test-key")
    }

    pub fn fake_game_json(id: u64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "slug": name.to_lowercase().replace(' ', "-"),
            "name": name,
            "released": "2020-01-01",
            "rating": 4.0,
            "platforms": [{"platform": {"id": 4, "name": "PC", "slug": "pc"}}],
            "genres": [{"id": 4, "name": "Action", "slug": "action"}]
        })
    }

    pub fn page_json(results: Vec<serde_json::Value>, next: Option<&str>) -> serde_json::Value {
        json!({
            "count": results.len(),
            "next": next,
            "previous": null,
            "results": results
        })
    }

    #[test]
    fn test_default_client_creation() {
        let client = DefaultRawgClient::new(test_config()).unwrap();
        assert_eq!(client.config().api_key, "test-key");
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        assert!(DefaultRawgClient::new(RawgConfig::new("")).is_err());
        assert!(RawgClient::with_backend(
            test_config().with_base_url("not a url"),
            FakeBackend::new()
        )
        .is_err());
    }

    #[test]
    fn test_resolve_next_adds_missing_key() {
        let client = RawgClient::with_backend(test_config(), FakeBackend::new()).unwrap();

        let url = client
            .resolve_next("https://api.rawg.io/api/games?page=2")
            .unwrap();
        assert!(url.as_str().contains("key=test-key"));

        let url = client
            .resolve_next("https://api.rawg.io/api/games?key=test-key&page=2")
            .unwrap();
        assert_eq!(url.query_pairs().filter(|(n, _)| n == "key").count(), 1);
    }

    #[test]
    fn test_resolve_next_refuses_foreign_host() {
        let client = RawgClient::with_backend(test_config(), FakeBackend::new()).unwrap();
        let result = client.resolve_next("https://evil.example.com/api/games?page=2");
        assert!(matches!(result, Err(RawgError::InvalidResponse { .. })));
    }

    #[tokio::test]
    async fn test_follow_fetches_next_page() {
        let backend = FakeBackend::new().with_response(
            "page=2",
            page_json(vec![fake_game_json(2, "Second")], None),
        );
        let client = RawgClient::with_backend(test_config(), backend).unwrap();

        let first: Page<serde_json::Value> = serde_json::from_value(page_json(
            vec![fake_game_json(1, "First")],
            Some("https://api.rawg.io/api/games?key=test-key&page=2"),
        ))
        .unwrap();

        let second = client.follow(&first).await.unwrap().unwrap();
        assert_eq!(second.results[0]["name"], "Second");
        assert!(client.follow(&second).await.unwrap().is_none());
    }
}
