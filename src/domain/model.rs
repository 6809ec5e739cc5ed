//! Typed views of RAWG API payloads.
//!
//! Fields RAWG may omit or send as `null` are optional, and unknown fields are
//! ignored so new API attributes never break deserialization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// RAWG list envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsrbRating {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformRequirements {
    pub minimum: Option<String>,
    pub recommended: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub platform: NamedRef,
    pub released_at: Option<String>,
    pub requirements: Option<PlatformRequirements>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentPlatformEntry {
    pub platform: NamedRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEntry {
    pub id: Option<u64>,
    pub store: NamedRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortScreenshot {
    pub id: i64,
    pub image: String,
}

/// Entry of `GET /games` and of the game relation lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: u64,
    pub slug: String,
    pub name: String,
    pub released: Option<NaiveDate>,
    #[serde(default)]
    pub tba: bool,
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub rating_top: u32,
    #[serde(default)]
    pub ratings_count: u64,
    pub metacritic: Option<u32>,
    #[serde(default)]
    pub playtime: u32,
    #[serde(default)]
    pub added: u64,
    pub updated: Option<String>,
    pub esrb_rating: Option<EsrbRating>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub platforms: Vec<PlatformEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parent_platforms: Vec<ParentPlatformEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stores: Vec<StoreEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub short_screenshots: Vec<ShortScreenshot>,
}

impl GameSummary {
    pub fn platform_names(&self) -> Vec<&str> {
        self.platforms
            .iter()
            .map(|p| p.platform.name.as_str())
            .collect()
    }

    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }
}

/// Payload of `GET /games/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDetails {
    pub id: u64,
    pub slug: String,
    pub name: String,
    pub name_original: Option<String>,
    pub description: Option<String>,
    pub description_raw: Option<String>,
    pub released: Option<NaiveDate>,
    #[serde(default)]
    pub tba: bool,
    pub updated: Option<String>,
    pub background_image: Option<String>,
    pub website: Option<String>,
    pub reddit_url: Option<String>,
    pub metacritic: Option<u32>,
    pub metacritic_url: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub rating_top: u32,
    #[serde(default)]
    pub ratings_count: u64,
    #[serde(default)]
    pub playtime: u32,
    #[serde(default)]
    pub added: u64,
    #[serde(default)]
    pub screenshots_count: u64,
    #[serde(default)]
    pub movies_count: u64,
    #[serde(default)]
    pub achievements_count: u64,
    #[serde(default)]
    pub creators_count: u64,
    #[serde(default)]
    pub additions_count: u64,
    #[serde(default)]
    pub game_series_count: u64,
    pub esrb_rating: Option<EsrbRating>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub alternative_names: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub platforms: Vec<PlatformEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub parent_platforms: Vec<ParentPlatformEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub developers: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub publishers: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub stores: Vec<StoreEntry>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<NamedRef>,
}

/// List entry for genres, platforms, developers, publishers, stores, tags and creators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedResource {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub games_count: u64,
    pub image_background: Option<String>,
}

/// Detail payload of a named resource. Store and platform specific fields
/// are `None` for other kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDetails {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub games_count: u64,
    pub image_background: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentPlatform {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub platforms: Vec<NamedResource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatorRole {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: i64,
    pub image: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(default)]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieData {
    #[serde(rename = "480")]
    pub low: Option<String>,
    pub max: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub name: String,
    pub preview: Option<String>,
    pub data: MovieData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub percent: Option<String>,
}

impl Achievement {
    /// RAWG sends the unlock percentage as a decimal string such as `"12.34"`.
    pub fn percent_value(&self) -> Option<f64> {
        self.percent.as_deref()?.trim().parse().ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStoreLink {
    pub id: u64,
    pub game_id: u64,
    pub store_id: u64,
    pub url: String,
}

/// A game is addressable by numeric id or by slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameRef {
    Id(u64),
    Slug(String),
}

impl GameRef {
    pub fn as_path_segment(&self) -> String {
        match self {
            GameRef::Id(id) => id.to_string(),
            GameRef::Slug(slug) => slug.clone(),
        }
    }
}

impl From<u64> for GameRef {
    fn from(id: u64) -> Self {
        GameRef::Id(id)
    }
}

impl From<&str> for GameRef {
    fn from(value: &str) -> Self {
        let value = value.trim();
        if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = value.parse() {
                return GameRef::Id(id);
            }
        }
        GameRef::Slug(value.to_string())
    }
}

impl From<String> for GameRef {
    fn from(value: String) -> Self {
        GameRef::from(value.as_str())
    }
}

impl From<&GameRef> for GameRef {
    fn from(value: &GameRef) -> Self {
        value.clone()
    }
}

impl fmt::Display for GameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameRef::Id(id) => write!(f, "{}", id),
            GameRef::Slug(slug) => f.write_str(slug),
        }
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
