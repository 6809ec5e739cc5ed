use crate::utils::error::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use url::Url;

/// Fetches JSON documents over HTTP.
///
/// `RawgClient` is generic over this so tests can substitute canned responses
/// for the network.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    async fn get_json<T: DeserializeOwned + Send>(&self, url: &Url) -> Result<T>;
}
