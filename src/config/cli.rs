use crate::config::rawg_config::RawgConfig;
use crate::config::toml_config::TomlConfig;
use crate::core::resources::ResourceKind;
use crate::domain::query::{GamesQuery, ListQuery, SortOrder};
use crate::output::OutputFormat;
use crate::utils::error::{RawgError, Result};
use crate::utils::validation::Validate;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "rawg")]
#[command(version, about = "Query the RAWG video games database")]
pub struct CliArgs {
    /// RAWG API key
    #[arg(long, env = "RAWG_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// TOML configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, env = "RAWG_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// table, json or csv
    #[arg(long, short, global = true)]
    pub format: Option<OutputFormat>,

    /// Write results to a file instead of stdout
    #[arg(long, short, global = true)]
    pub output: Option<PathBuf>,

    #[arg(long, short, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Search and filter games
    Games(GamesArgs),
    /// Show one game by id or slug
    Game(GameArgs),
    /// List genres, platforms, developers, publishers, stores, tags or creators
    List {
        kind: ResourceKind,
        #[command(flatten)]
        paging: PagingArgs,
    },
    /// Show one genre, platform, developer, publisher, store, tag or creator
    Show { kind: ResourceKind, id: String },
    /// List parent platforms with their platforms
    ParentPlatforms(PagingArgs),
    /// List creator positions
    CreatorRoles(PagingArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct PagingArgs {
    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub page_size: Option<u32>,

    /// e.g. name, -games_count
    #[arg(long, allow_hyphen_values = true)]
    pub ordering: Option<String>,
}

impl PagingArgs {
    pub fn to_list_query(&self, default_page_size: Option<u32>) -> ListQuery {
        let mut query = ListQuery::new();
        if let Some(page) = self.page {
            query = query.with_page(page);
        }
        if let Some(size) = self.page_size.or(default_page_size) {
            query = query.with_page_size(size);
        }
        if let Some(ordering) = &self.ordering {
            query = query.with_ordering(ordering.clone());
        }
        query
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct GamesArgs {
    /// Free-text search
    pub search: Option<String>,

    #[arg(long)]
    pub precise: bool,

    #[arg(long)]
    pub exact: bool,

    #[arg(long, value_delimiter = ',')]
    pub platforms: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub parent_platforms: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub stores: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub developers: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub publishers: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub genres: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub tags: Vec<String>,

    #[arg(long, value_delimiter = ',')]
    pub creators: Vec<String>,

    /// Release date range, e.g. 2019-01-01,2019-12-31
    #[arg(long)]
    pub dates: Option<String>,

    /// Metacritic score range, e.g. 80,100
    #[arg(long)]
    pub metacritic: Option<String>,

    #[arg(long)]
    pub exclude_additions: bool,

    #[arg(long)]
    pub exclude_parents: bool,

    #[arg(long)]
    pub exclude_game_series: bool,

    /// e.g. -rating, released, name
    #[arg(long, allow_hyphen_values = true)]
    pub ordering: Option<SortOrder>,

    #[arg(long)]
    pub page: Option<u32>,

    #[arg(long)]
    pub page_size: Option<u32>,

    /// Follow `next` links and collect every page
    #[arg(long)]
    pub all: bool,

    #[arg(long, default_value = "10")]
    pub max_pages: usize,
}

impl GamesArgs {
    pub fn to_query(&self, default_page_size: Option<u32>) -> Result<GamesQuery> {
        let mut query = GamesQuery::new()
            .with_platforms(&self.platforms)
            .with_parent_platforms(&self.parent_platforms)
            .with_stores(&self.stores)
            .with_developers(&self.developers)
            .with_publishers(&self.publishers)
            .with_genres(&self.genres)
            .with_tags(&self.tags)
            .with_creators(&self.creators);

        if let Some(search) = &self.search {
            query = query.with_search(search.clone());
        }
        if self.precise {
            query = query.with_search_precise(true);
        }
        if self.exact {
            query = query.with_search_exact(true);
        }
        if let Some(dates) = &self.dates {
            let (start, end) = parse_date_range(dates)?;
            query = query.with_dates(start, end);
        }
        if let Some(scores) = &self.metacritic {
            let (min, max) = parse_score_range(scores)?;
            query = query.with_metacritic(min, max);
        }
        if self.exclude_additions {
            query = query.with_exclude_additions(true);
        }
        if self.exclude_parents {
            query = query.with_exclude_parents(true);
        }
        if self.exclude_game_series {
            query = query.with_exclude_game_series(true);
        }
        if let Some(ordering) = self.ordering {
            query = query.with_ordering(ordering);
        }
        if let Some(page) = self.page {
            query = query.with_page(page);
        }
        if let Some(size) = self.page_size.or(default_page_size) {
            query = query.with_page_size(size);
        }
        Ok(query)
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct GameArgs {
    /// Numeric id or slug
    pub game: String,

    #[arg(long)]
    pub screenshots: bool,

    #[arg(long)]
    pub movies: bool,

    #[arg(long)]
    pub stores: bool,

    #[arg(long)]
    pub achievements: bool,

    #[arg(long)]
    pub additions: bool,

    #[arg(long)]
    pub series: bool,

    #[arg(long)]
    pub parents: bool,

    #[arg(long)]
    pub team: bool,
}

/// Effective settings after merging CLI flags over the config file.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub rawg: RawgConfig,
    pub format: OutputFormat,
    pub page_size: Option<u32>,
}

impl CliArgs {
    /// CLI flags override the config file, which overrides built-in defaults.
    pub fn resolve(&self) -> Result<ResolvedSettings> {
        let file_config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };
        file_config.validate()?;

        let format = match (self.format, file_config.output.format.as_deref()) {
            (Some(format), _) => format,
            (None, Some(name)) => name.parse()?,
            (None, None) => OutputFormat::Table,
        };
        let page_size = file_config.output.page_size;

        let mut rawg = file_config.into_rawg_config(self.api_key.clone())?;
        if let Some(base_url) = &self.base_url {
            rawg.base_url = base_url.clone();
            rawg.validate()?;
        }

        Ok(ResolvedSettings {
            rawg,
            format,
            page_size,
        })
    }
}

fn parse_date_range(value: &str) -> Result<(NaiveDate, NaiveDate)> {
    let (start, end) = split_range("dates", value)?;
    let parse = |s: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| RawgError::InvalidConfigValueError {
            field: "dates".to_string(),
            value: value.to_string(),
            reason: format!("Expected YYYY-MM-DD: {}", e),
        })
    };
    Ok((parse(start)?, parse(end)?))
}

fn parse_score_range(value: &str) -> Result<(u32, u32)> {
    let (min, max) = split_range("metacritic", value)?;
    let parse = |s: &str| {
        s.parse::<u32>()
            .map_err(|e| RawgError::InvalidConfigValueError {
                field: "metacritic".to_string(),
                value: value.to_string(),
                reason: e.to_string(),
            })
    };
    Ok((parse(min)?, parse(max)?))
}

fn split_range<'a>(field: &str, value: &'a str) -> Result<(&'a str, &'a str)> {
    value
        .split_once(',')
        .map(|(a, b)| (a.trim(), b.trim()))
        .ok_or_else(|| RawgError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "Expected two comma-separated values".to_string(),
        })
}
