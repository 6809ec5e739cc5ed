//! URL construction for RAWG endpoints.

use crate::config::RawgConfig;
use crate::utils::error::Result;
use url::Url;

/// Builds `{base}/{segments...}?key=...&{pairs...}`.
///
/// Segments are percent-encoded individually, so slugs containing `/` or
/// spaces cannot escape their path position.
pub fn build_url(
    config: &RawgConfig,
    segments: &[&str],
    pairs: &[(&'static str, String)],
) -> Result<Url> {
    let mut url = Url::parse(config.base_url.trim_end_matches('/'))?;

    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }

    {
        let mut query = url.query_pairs_mut();
        query.clear();
        query.append_pair("key", &config.api_key);
        for (name, value) in pairs {
            query.append_pair(name, value);
        }
    }

    Ok(url)
}

/// Copy of `url` with the `key` parameter masked, for logs and errors.
pub fn redact(url: &Url) -> String {
    if !url.query_pairs().any(|(name, _)| name == "key") {
        return url.to_string();
    }

    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            let value = if name == "key" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (name.into_owned(), value)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}
