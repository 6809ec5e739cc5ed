//! Rendering of API results as an aligned table, JSON or CSV.

use crate::domain::model::{
    Achievement, CreatorRole, GameDetails, GameStoreLink, GameSummary, Movie, NamedResource,
    ParentPlatform, ResourceDetails, Screenshot,
};
use crate::utils::error::{RawgError, Result};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

const MAX_CELL_WIDTH: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = RawgError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(RawgError::InvalidConfigValueError {
                field: "format".to_string(),
                value: other.to_string(),
                reason: "Valid formats: table, json, csv".to_string(),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        })
    }
}

/// Flat row view used by the table and CSV renderers.
pub trait Tabular {
    fn headers() -> &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn names<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    values.into_iter().collect::<Vec<_>>().join("|")
}

impl Tabular for GameSummary {
    fn headers() -> &'static [&'static str] {
        &["id", "slug", "name", "released", "rating", "metacritic", "playtime", "platforms", "genres"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.slug.clone(),
            self.name.clone(),
            if self.tba {
                "TBA".to_string()
            } else {
                opt(&self.released)
            },
            format!("{:.2}", self.rating),
            opt(&self.metacritic),
            self.playtime.to_string(),
            names(self.platform_names()),
            names(self.genre_names()),
        ]
    }
}

impl Tabular for GameDetails {
    fn headers() -> &'static [&'static str] {
        &["id", "slug", "name", "released", "rating", "metacritic", "playtime", "developers", "publishers", "website"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.slug.clone(),
            self.name.clone(),
            if self.tba {
                "TBA".to_string()
            } else {
                opt(&self.released)
            },
            format!("{:.2}", self.rating),
            opt(&self.metacritic),
            self.playtime.to_string(),
            names(self.developers.iter().map(|d| d.name.as_str())),
            names(self.publishers.iter().map(|p| p.name.as_str())),
            opt(&self.website),
        ]
    }
}

impl Tabular for NamedResource {
    fn headers() -> &'static [&'static str] {
        &["id", "slug", "name", "games_count"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.slug.clone(),
            self.name.clone(),
            self.games_count.to_string(),
        ]
    }
}

impl Tabular for ResourceDetails {
    fn headers() -> &'static [&'static str] {
        &["id", "slug", "name", "games_count", "domain", "years"]
    }

    fn row(&self) -> Vec<String> {
        let years = match (self.year_start, self.year_end) {
            (Some(start), Some(end)) => format!("{}-{}", start, end),
            (Some(start), None) => format!("{}-", start),
            _ => String::new(),
        };
        vec![
            self.id.to_string(),
            self.slug.clone(),
            self.name.clone(),
            self.games_count.to_string(),
            opt(&self.domain),
            years,
        ]
    }
}

impl Tabular for ParentPlatform {
    fn headers() -> &'static [&'static str] {
        &["id", "slug", "name", "platforms"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.slug.clone(),
            self.name.clone(),
            names(self.platforms.iter().map(|p| p.name.as_str())),
        ]
    }
}

impl Tabular for CreatorRole {
    fn headers() -> &'static [&'static str] {
        &["id", "slug", "name"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.id.to_string(), self.slug.clone(), self.name.clone()]
    }
}

impl Tabular for Screenshot {
    fn headers() -> &'static [&'static str] {
        &["id", "width", "height", "image"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            opt(&self.width),
            opt(&self.height),
            self.image.clone(),
        ]
    }
}

impl Tabular for Movie {
    fn headers() -> &'static [&'static str] {
        &["id", "name", "max"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), opt(&self.data.max)]
    }
}

impl Tabular for Achievement {
    fn headers() -> &'static [&'static str] {
        &["id", "name", "percent", "description"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            opt(&self.percent),
            opt(&self.description),
        ]
    }
}

impl Tabular for GameStoreLink {
    fn headers() -> &'static [&'static str] {
        &["store_id", "url"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.store_id.to_string(), self.url.clone()]
    }
}

/// Writes `items` in `format`.
pub fn render<T, W>(format: OutputFormat, items: &[T], writer: &mut W) -> Result<()>
where
    T: Tabular + Serialize,
    W: Write,
{
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, items)?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(&mut *writer);
            csv_writer.write_record(T::headers())?;
            for item in items {
                csv_writer.write_record(item.row())?;
            }
            csv_writer.flush()?;
        }
        OutputFormat::Table => write_table(T::headers(), items.iter().map(T::row), writer)?,
    }
    Ok(())
}

fn truncate(cell: &str) -> String {
    let single_line = cell.replace(['\n', '\r', '\t'], " ");
    if single_line.chars().count() <= MAX_CELL_WIDTH {
        single_line
    } else {
        let cut: String = single_line.chars().take(MAX_CELL_WIDTH - 1).collect();
        format!("{}…", cut)
    }
}

fn write_table<W: Write>(
    headers: &[&str],
    rows: impl Iterator<Item = Vec<String>>,
    writer: &mut W,
) -> Result<()> {
    let rows: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(|cell| truncate(cell)).collect())
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| {
                let pad = width.saturating_sub(cell.chars().count());
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    writeln!(
        writer,
        "{}",
        line(headers.iter().map(|h| h.to_uppercase()).collect())
    )?;
    for row in rows {
        writeln!(writer, "{}", line(row))?;
    }
    Ok(())
}
