//! Async client for the [RAWG](https://rawg.io/apidocs) video games database API.

#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod output;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliArgs;
pub use crate::config::{RawgConfig, TomlConfig};

pub use crate::core::pagination::Pager;
pub use crate::core::resources::ResourceKind;
pub use crate::core::{http::ReqwestBackend, DefaultRawgClient, RawgClient};
pub use crate::domain::model::{
    Achievement, CreatorRole, GameDetails, GameRef, GameStoreLink, GameSummary, Movie,
    NamedResource, Page, ParentPlatform, ResourceDetails, Screenshot,
};
pub use crate::domain::ports::HttpBackend;
pub use crate::domain::query::{GamesQuery, ListQuery, Ordering, SortOrder};
pub use crate::output::OutputFormat;
pub use crate::utils::error::{RawgError, RawgResult, Result};
