//! Query builders for RAWG list endpoints.
//!
//! Builders only carry filter parameters. The API key is attached when the URL
//! is built, never here.

use crate::utils::error::{RawgError, Result};
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// RAWG caps `page_size` at 40.
pub const MAX_PAGE_SIZE: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    Name,
    Released,
    Added,
    Created,
    Updated,
    Rating,
    Metacritic,
}

impl Ordering {
    pub fn as_api_param(self) -> &'static str {
        match self {
            Ordering::Name => "name",
            Ordering::Released => "released",
            Ordering::Added => "added",
            Ordering::Created => "created",
            Ordering::Updated => "updated",
            Ordering::Rating => "rating",
            Ordering::Metacritic => "metacritic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: Ordering,
    pub descending: bool,
}

impl SortOrder {
    pub fn ascending(field: Ordering) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub fn descending(field: Ordering) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descending {
            f.write_str("-")?;
        }
        f.write_str(self.field.as_api_param())
    }
}

impl FromStr for SortOrder {
    type Err = RawgError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (descending, name) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let field = match name {
            "name" => Ordering::Name,
            "released" => Ordering::Released,
            "added" => Ordering::Added,
            "created" => Ordering::Created,
            "updated" => Ordering::Updated,
            "rating" => Ordering::Rating,
            "metacritic" => Ordering::Metacritic,
            _ => {
                return Err(RawgError::InvalidConfigValueError {
                    field: "ordering".to_string(),
                    value: s.to_string(),
                    reason: "Valid fields: name, released, added, created, updated, rating, metacritic (prefix '-' to reverse)".to_string(),
                })
            }
        };
        Ok(Self { field, descending })
    }
}

/// Inclusive range rendered as `min,max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range<T> {
    pub start: T,
    pub end: T,
}

impl Range<NaiveDate> {
    fn to_param(self) -> String {
        format!(
            "{},{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

impl Range<u32> {
    fn to_param(self) -> String {
        format!("{},{}", self.start, self.end)
    }
}

/// Filters for `GET /games`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamesQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub search: Option<String>,
    pub search_precise: Option<bool>,
    pub search_exact: Option<bool>,
    pub parent_platforms: Vec<String>,
    pub platforms: Vec<String>,
    pub stores: Vec<String>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub creators: Vec<String>,
    pub dates: Option<Range<NaiveDate>>,
    pub updated: Option<Range<NaiveDate>>,
    pub metacritic: Option<Range<u32>>,
    pub platforms_count: Option<u32>,
    pub exclude_additions: Option<bool>,
    pub exclude_parents: Option<bool>,
    pub exclude_game_series: Option<bool>,
    pub exclude_stores: Vec<String>,
    pub ordering: Option<SortOrder>,
}

fn to_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: ToString,
{
    values.into_iter().map(|v| v.to_string()).collect()
}

fn push_list(pairs: &mut Vec<(&'static str, String)>, name: &'static str, values: &[String]) {
    let joined = values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(",");
    if !joined.is_empty() {
        pairs.push((name, joined));
    }
}

fn push_opt<T: ToString>(pairs: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<T>) {
    if let Some(value) = value {
        pairs.push((name, value.to_string()));
    }
}

fn clamp_page_size(size: u32) -> u32 {
    size.clamp(1, MAX_PAGE_SIZE)
}

impl GamesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(clamp_page_size(page_size));
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_search_precise(mut self, precise: bool) -> Self {
        self.search_precise = Some(precise);
        self
    }

    #[must_use]
    pub fn with_search_exact(mut self, exact: bool) -> Self {
        self.search_exact = Some(exact);
        self
    }

    #[must_use]
    pub fn with_parent_platforms<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.parent_platforms = to_strings(ids);
        self
    }

    #[must_use]
    pub fn with_platforms<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.platforms = to_strings(ids);
        self
    }

    #[must_use]
    pub fn with_stores<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.stores = to_strings(ids);
        self
    }

    #[must_use]
    pub fn with_developers<I, S>(mut self, ids_or_slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.developers = to_strings(ids_or_slugs);
        self
    }

    #[must_use]
    pub fn with_publishers<I, S>(mut self, ids_or_slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.publishers = to_strings(ids_or_slugs);
        self
    }

    #[must_use]
    pub fn with_genres<I, S>(mut self, ids_or_slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.genres = to_strings(ids_or_slugs);
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, ids_or_slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.tags = to_strings(ids_or_slugs);
        self
    }

    #[must_use]
    pub fn with_creators<I, S>(mut self, ids_or_slugs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.creators = to_strings(ids_or_slugs);
        self
    }

    /// Release dates between `start` and `end`, inclusive. Bounds are swapped
    /// if given in reverse.
    #[must_use]
    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.dates = Some(Range {
            start: start.min(end),
            end: start.max(end),
        });
        self
    }

    #[must_use]
    pub fn with_updated(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.updated = Some(Range {
            start: start.min(end),
            end: start.max(end),
        });
        self
    }

    /// Metacritic scores are 0..=100.
    #[must_use]
    pub fn with_metacritic(mut self, min: u32, max: u32) -> Self {
        let (min, max) = (min.min(max).min(100), max.max(min).min(100));
        self.metacritic = Some(Range { start: min, end: max });
        self
    }

    #[must_use]
    pub fn with_platforms_count(mut self, count: u32) -> Self {
        self.platforms_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_exclude_additions(mut self, exclude: bool) -> Self {
        self.exclude_additions = Some(exclude);
        self
    }

    #[must_use]
    pub fn with_exclude_parents(mut self, exclude: bool) -> Self {
        self.exclude_parents = Some(exclude);
        self
    }

    #[must_use]
    pub fn with_exclude_game_series(mut self, exclude: bool) -> Self {
        self.exclude_game_series = Some(exclude);
        self
    }

    #[must_use]
    pub fn with_exclude_stores<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.exclude_stores = to_strings(ids);
        self
    }

    #[must_use]
    pub fn with_ordering(mut self, ordering: SortOrder) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();

        push_opt(&mut pairs, "page", self.page.map(|p| p.max(1)));
        push_opt(&mut pairs, "page_size", self.page_size.map(clamp_page_size));
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                pairs.push(("search", search.to_string()));
            }
        }
        push_opt(&mut pairs, "search_precise", self.search_precise);
        push_opt(&mut pairs, "search_exact", self.search_exact);
        push_list(&mut pairs, "parent_platforms", &self.parent_platforms);
        push_list(&mut pairs, "platforms", &self.platforms);
        push_list(&mut pairs, "stores", &self.stores);
        push_list(&mut pairs, "developers", &self.developers);
        push_list(&mut pairs, "publishers", &self.publishers);
        push_list(&mut pairs, "genres", &self.genres);
        push_list(&mut pairs, "tags", &self.tags);
        push_list(&mut pairs, "creators", &self.creators);
        push_opt(&mut pairs, "dates", self.dates.map(Range::<NaiveDate>::to_param));
        push_opt(&mut pairs, "updated", self.updated.map(Range::<NaiveDate>::to_param));
        push_opt(&mut pairs, "metacritic", self.metacritic.map(Range::<u32>::to_param));
        push_opt(&mut pairs, "platforms_count", self.platforms_count);
        push_opt(&mut pairs, "exclude_additions", self.exclude_additions);
        push_opt(&mut pairs, "exclude_parents", self.exclude_parents);
        push_opt(&mut pairs, "exclude_game_series", self.exclude_game_series);
        push_list(&mut pairs, "exclude_stores", &self.exclude_stores);
        push_opt(&mut pairs, "ordering", self.ordering);

        pairs
    }
}

/// Paging and ordering for named-resource lists and game relation lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub ordering: Option<String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(clamp_page_size(page_size));
        self
    }

    #[must_use]
    pub fn with_ordering(mut self, ordering: impl Into<String>) -> Self {
        self.ordering = Some(ordering.into());
        self
    }

    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "page", self.page.map(|p| p.max(1)));
        push_opt(&mut pairs, "page_size", self.page_size.map(clamp_page_size));
        if let Some(ordering) = self.ordering.as_deref().map(str::trim) {
            if !ordering.is_empty() {
                pairs.push(("ordering", ordering.to_string()));
            }
        }
        pairs
    }
}
