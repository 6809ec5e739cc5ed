use crate::config::cli::{CliArgs, Command, GameArgs, GamesArgs};
use crate::core::client::{DefaultRawgClient, RawgClient};
use crate::domain::ports::HttpBackend;
use crate::domain::query::ListQuery;
use crate::output::{render, OutputFormat, Tabular};
use crate::utils::error::Result;
use regex::Regex;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::LazyLock;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("HTML tag pattern is a valid regex"));

/// Output settings shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub page_size: Option<u32>,
}

/// Resolves configuration, runs the subcommand and writes its output.
pub async fn run(args: &CliArgs) -> Result<()> {
    let settings = args.resolve()?;
    tracing::debug!(config = ?settings.rawg, format = %settings.format, "Resolved settings");

    let client = DefaultRawgClient::new(settings.rawg)?;
    let options = RenderOptions {
        format: settings.format,
        page_size: settings.page_size,
    };

    // 先寫入緩衝區，命令成功後才建立輸出檔
    let mut buffer = Vec::new();
    execute(&client, &args.command, options, &mut buffer).await?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &buffer)?;
            tracing::info!("📁 Output saved to: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&buffer)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

pub async fn execute<B, W>(
    client: &RawgClient<B>,
    command: &Command,
    options: RenderOptions,
    out: &mut W,
) -> Result<()>
where
    B: HttpBackend,
    W: Write,
{
    match command {
        Command::Games(games) => run_games(client, games, options, out).await,
        Command::Game(game) => run_game(client, game, options, out).await,
        Command::List { kind, paging } => {
            let page = client
                .list_resources(*kind, &paging.to_list_query(options.page_size))
                .await?;
            tracing::info!("{} of {} {}", page.results.len(), page.count, kind);
            render(options.format, &page.results, out)
        }
        Command::Show { kind, id } => {
            let details = client.resource(*kind, id).await?;
            render(options.format, std::slice::from_ref(&details), out)?;
            if options.format == OutputFormat::Table {
                if let Some(description) = details.description.as_deref() {
                    writeln!(out, "\n{}", strip_html(description))?;
                }
            }
            Ok(())
        }
        Command::ParentPlatforms(paging) => {
            let page = client
                .parent_platforms(&paging.to_list_query(options.page_size))
                .await?;
            render(options.format, &page.results, out)
        }
        Command::CreatorRoles(paging) => {
            let page = client
                .creator_roles(&paging.to_list_query(options.page_size))
                .await?;
            render(options.format, &page.results, out)
        }
    }
}

async fn run_games<B: HttpBackend, W: Write>(
    client: &RawgClient<B>,
    args: &GamesArgs,
    options: RenderOptions,
    out: &mut W,
) -> Result<()> {
    let query = args.to_query(options.page_size)?;

    let games = if args.all {
        let games = client.all_games(&query, args.max_pages).await?;
        tracing::info!("Collected {} games", games.len());
        games
    } else {
        let page = client.list_games(&query).await?;
        tracing::info!("{} of {} games", page.results.len(), page.count);
        page.results
    };

    render(options.format, &games, out)
}

/// One optional section of the `game` command.
struct Section<T> {
    name: &'static str,
    items: Option<Vec<T>>,
}

impl<T: Tabular + Serialize> Section<T> {
    fn write_text<W: Write>(&self, format: OutputFormat, out: &mut W) -> Result<()> {
        if let Some(items) = &self.items {
            writeln!(out, "\n# {}", self.name)?;
            render(format, items, out)?;
        }
        Ok(())
    }

    fn insert_json(&self, object: &mut serde_json::Map<String, serde_json::Value>) -> Result<()> {
        if let Some(items) = &self.items {
            object.insert(self.name.to_string(), serde_json::to_value(items)?);
        }
        Ok(())
    }
}

async fn run_game<B: HttpBackend, W: Write>(
    client: &RawgClient<B>,
    args: &GameArgs,
    options: RenderOptions,
    out: &mut W,
) -> Result<()> {
    let game = crate::domain::model::GameRef::from(args.game.as_str());
    let details = client.game(&game).await?;
    let list = ListQuery::new().with_page_size(options.page_size.unwrap_or(20));

    let screenshots = Section {
        name: "screenshots",
        items: if args.screenshots {
            Some(client.game_screenshots(&game, &list).await?.results)
        } else {
            None
        },
    };
    let movies = Section {
        name: "movies",
        items: if args.movies {
            Some(client.game_movies(&game).await?.results)
        } else {
            None
        },
    };
    let stores = Section {
        name: "stores",
        items: if args.stores {
            Some(client.game_stores(&game, &list).await?.results)
        } else {
            None
        },
    };
    let achievements = Section {
        name: "achievements",
        items: if args.achievements {
            Some(client.game_achievements(&game, &list).await?.results)
        } else {
            None
        },
    };
    let additions = Section {
        name: "additions",
        items: if args.additions {
            Some(client.game_additions(&game, &list).await?.results)
        } else {
            None
        },
    };
    let series = Section {
        name: "series",
        items: if args.series {
            Some(client.game_series(&game, &list).await?.results)
        } else {
            None
        },
    };
    let parents = Section {
        name: "parents",
        items: if args.parents {
            Some(client.game_parents(&game, &list).await?.results)
        } else {
            None
        },
    };
    let team = Section {
        name: "team",
        items: if args.team {
            Some(client.game_development_team(&game, &list).await?.results)
        } else {
            None
        },
    };

    match options.format {
        OutputFormat::Json => {
            let mut object = serde_json::Map::new();
            object.insert("game".to_string(), serde_json::to_value(&details)?);
            screenshots.insert_json(&mut object)?;
            movies.insert_json(&mut object)?;
            stores.insert_json(&mut object)?;
            achievements.insert_json(&mut object)?;
            additions.insert_json(&mut object)?;
            series.insert_json(&mut object)?;
            parents.insert_json(&mut object)?;
            team.insert_json(&mut object)?;
            serde_json::to_writer_pretty(&mut *out, &object)?;
            writeln!(out)?;
        }
        format => {
            render(format, std::slice::from_ref(&details), out)?;
            if format == OutputFormat::Table {
                if let Some(description) = details.description_raw.as_deref() {
                    writeln!(out, "\n{}", description.trim())?;
                }
            }
            screenshots.write_text(format, out)?;
            movies.write_text(format, out)?;
            stores.write_text(format, out)?;
            achievements.write_text(format, out)?;
            additions.write_text(format, out)?;
            series.write_text(format, out)?;
            parents.write_text(format, out)?;
            team.write_text(format, out)?;
        }
    }
    Ok(())
}

/// RAWG descriptions are HTML fragments.
fn strip_html(html: &str) -> String {
    HTML_TAG
        .replace_all(html, "")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::PagingArgs;
    use crate::config::RawgConfig;
    use crate::core::http::testing::FakeBackend;
    use crate::core::resources::ResourceKind;
    use serde_json::json;

    fn options(format: OutputFormat) -> RenderOptions {
        RenderOptions {
            format,
            page_size: None,
        }
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Action &amp; <b>adventure</b></p>\n"),
            "Action & adventure"
        );
    }

    #[tokio::test]
    async fn test_show_command_prints_description() {
        let backend = FakeBackend::new().with_response(
            "/genres/action?",
            json!({"id": 4, "name": "Action", "slug": "action", "games_count": 5, "description": "<p>Fast games.</p>"}),
        );
        let client = RawgClient::with_backend(RawgConfig::new("k"), backend).unwrap();
        let command = Command::Show {
            kind: ResourceKind::Genres,
            id: "action".to_string(),
        };

        let mut out = Vec::new();
        execute(&client, &command, options(OutputFormat::Table), &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("ID  SLUG    NAME    GAMES_COUNT"));
        assert!(text.trim_end().ends_with("Fast games."));
    }

    #[tokio::test]
    async fn test_game_command_json_sections() {
        let backend = FakeBackend::new()
            .with_response(
                "/screenshots?",
                json!({"count": 1, "next": null, "previous": null, "results": [{"id": 9, "image": "https://img/9.jpg"}]}),
            )
            .with_response(
                "/games/portal-2?",
                json!({"id": 4200, "slug": "portal-2", "name": "Portal 2"}),
            );
        let client = RawgClient::with_backend(RawgConfig::new("k"), backend).unwrap();
        let command = Command::Game(GameArgs {
            game: "portal-2".to_string(),
            screenshots: true,
            ..Default::default()
        });

        let mut out = Vec::new();
        execute(&client, &command, options(OutputFormat::Json), &mut out)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["game"]["id"], 4200);
        assert_eq!(value["screenshots"][0]["id"], 9);
        assert!(value.get("movies").is_none());
    }

    #[tokio::test]
    async fn test_creator_roles_csv() {
        let backend = FakeBackend::new().with_response(
            "/creator-roles?",
            json!({"count": 2, "next": null, "previous": null, "results": [
                {"id": 1, "name": "writer", "slug": "writer"},
                {"id": 2, "name": "composer", "slug": "composer"}
            ]}),
        );
        let client = RawgClient::with_backend(RawgConfig::new("k"), backend).unwrap();

        let mut out = Vec::new();
        execute(
            &client,
            &Command::CreatorRoles(PagingArgs::default()),
            options(OutputFormat::Csv),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,slug,name\n1,writer,writer\n2,composer,composer\n"
        );
    }

    fn page(results: serde_json::Value) -> serde_json::Value {
        json!({"count": results.as_array().map_or(0, Vec::len), "next": null, "previous": null, "results": results})
    }

    #[tokio::test]
    async fn test_list_command_uses_paging_flags() {
        let backend = FakeBackend::new().with_response(
            "/tags?",
            page(json!([{"id": 31, "name": "Singleplayer", "slug": "singleplayer", "games_count": 9}])),
        );
        let client = RawgClient::with_backend(RawgConfig::new("k"), backend).unwrap();
        let command = Command::List {
            kind: ResourceKind::Tags,
            paging: PagingArgs {
                page: Some(2),
                page_size: None,
                ordering: Some("-games_count".to_string()),
            },
        };
        let options = RenderOptions {
            format: OutputFormat::Csv,
            page_size: Some(7),
        };

        let mut out = Vec::new();
        execute(&client, &command, options, &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,slug,name,games_count\n31,singleplayer,Singleplayer,9\n"
        );
        let url = client.backend().requests()[0].to_string();
        assert!(url.contains("page=2"));
        assert!(url.contains("page_size=7"));
        assert!(url.contains("ordering=-games_count"));
    }

    #[tokio::test]
    async fn test_parent_platforms_table() {
        let backend = FakeBackend::new().with_response(
            "/platforms/lists/parents?",
            page(json!([{
                "id": 7,
                "name": "Nintendo",
                "slug": "nintendo",
                "platforms": [{"id": 7, "name": "Nintendo Switch", "slug": "nintendo-switch"}]
            }])),
        );
        let client = RawgClient::with_backend(RawgConfig::new("k"), backend).unwrap();

        let mut out = Vec::new();
        execute(
            &client,
            &Command::ParentPlatforms(PagingArgs::default()),
            options(OutputFormat::Table),
            &mut out,
        )
        .await
        .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("nintendo"));
        assert!(text.contains("Nintendo Switch"));
    }

    #[tokio::test]
    async fn test_games_command_single_page_and_all_pages() {
        let backend = FakeBackend::new()
            .with_response(
                "page=2",
                page(json!([{"id": 2, "slug": "hades-2", "name": "Hades II"}])),
            )
            .with_response(
                "/games?",
                json!({
                    "count": 2,
                    "next": "https://api.rawg.io/api/games?key=k&search=hades&page=2",
                    "previous": null,
                    "results": [{"id": 1, "slug": "hades", "name": "Hades"}]
                }),
            );
        let client = RawgClient::with_backend(RawgConfig::new("k"), backend).unwrap();

        let single = Command::Games(GamesArgs {
            search: Some("hades".to_string()),
            ..Default::default()
        });
        let mut out = Vec::new();
        execute(&client, &single, options(OutputFormat::Json), &mut out)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 1);
        assert_eq!(client.backend().requests().len(), 1);

        let all = Command::Games(GamesArgs {
            search: Some("hades".to_string()),
            all: true,
            max_pages: 5,
            ..Default::default()
        });
        let mut out = Vec::new();
        execute(&client, &all, options(OutputFormat::Json), &mut out)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value[0]["slug"], "hades");
        assert_eq!(value[1]["slug"], "hades-2");
        assert_eq!(client.backend().requests().len(), 3);
    }

    #[tokio::test]
    async fn test_game_command_table_with_every_section() {
        let backend = FakeBackend::new()
            .with_response(
                "/screenshots?",
                page(json!([{"id": 9, "image": "https://img/9.jpg", "width": 1920, "height": 1080}])),
            )
            .with_response(
                "/movies?",
                page(json!([{"id": 16, "name": "Trailer", "preview": null, "data": {"max": "https://movie/16.mp4"}}])),
            )
            .with_response(
                "/stores?",
                page(json!([{"id": 3, "game_id": 4200, "store_id": 1, "url": "https://store/portal-2"}])),
            )
            .with_response(
                "/achievements?",
                page(json!([{"id": 5, "name": "Wake Up Call", "description": "Survive", "percent": "80.5"}])),
            )
            .with_response(
                "/additions?",
                page(json!([{"id": 11, "slug": "portal-2-dlc", "name": "Portal 2 DLC"}])),
            )
            .with_response(
                "/game-series?",
                page(json!([{"id": 12, "slug": "portal", "name": "Portal"}])),
            )
            .with_response(
                "/parent-games?",
                page(json!([{"id": 13, "slug": "half-life-2", "name": "Half-Life 2"}])),
            )
            .with_response(
                "/development-team?",
                page(json!([{"id": 14, "name": "Erik Wolpaw", "slug": "erik-wolpaw"}])),
            )
            .with_response(
                "/games/portal-2?",
                json!({
                    "id": 4200,
                    "slug": "portal-2",
                    "name": "Portal 2",
                    "description_raw": "  A puzzle game.\n"
                }),
            );
        let client = RawgClient::with_backend(RawgConfig::new("k"), backend).unwrap();
        let command = Command::Game(GameArgs {
            game: "portal-2".to_string(),
            screenshots: true,
            movies: true,
            stores: true,
            achievements: true,
            additions: true,
            series: true,
            parents: true,
            team: true,
        });

        let mut out = Vec::new();
        execute(&client, &command, options(OutputFormat::Table), &mut out)
            .await
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("\nA puzzle game.\n"));
        for (heading, value) in [
            ("# screenshots", "https://img/9.jpg"),
            ("# movies", "https://movie/16.mp4"),
            ("# stores", "https://store/portal-2"),
            ("# achievements", "Wake Up Call"),
            ("# additions", "portal-2-dlc"),
            ("# series", "Portal"),
            ("# parents", "half-life-2"),
            ("# team", "erik-wolpaw"),
        ] {
            let at = text.find(heading).unwrap_or_else(|| panic!("missing {}", heading));
            assert!(text[at..].contains(value), "{} lacks {}", heading, value);
        }
        assert_eq!(client.backend().requests().len(), 9);
    }

    #[tokio::test]
    async fn test_show_command_json_has_no_trailing_text() {
        let backend = FakeBackend::new().with_response(
            "/stores/steam?",
            json!({"id": 1, "name": "Steam", "slug": "steam", "domain": "store.steampowered.com", "description": "<p>PC store</p>"}),
        );
        let client = RawgClient::with_backend(RawgConfig::new("k"), backend).unwrap();
        let command = Command::Show {
            kind: ResourceKind::Stores,
            id: "steam".to_string(),
        };

        let mut out = Vec::new();
        execute(&client, &command, options(OutputFormat::Json), &mut out)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value[0]["domain"], "store.steampowered.com");
    }

    #[tokio::test]
    async fn test_failed_command_writes_nothing() {
        let client = RawgClient::with_backend(RawgConfig::new("k"), FakeBackend::new()).unwrap();
        let command = Command::Show {
            kind: ResourceKind::Creators,
            id: "nobody".to_string(),
        };

        let mut out = Vec::new();
        let result = execute(&client, &command, options(OutputFormat::Table), &mut out).await;

        assert!(result.is_err());
        assert!(out.is_empty());
    }
}
