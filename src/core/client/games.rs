use crate::core::pagination::Pager;
use crate::domain::model::{
    Achievement, GameDetails, GameRef, GameStoreLink, GameSummary, Movie, NamedResource, Page,
    Screenshot,
};
use crate::domain::ports::HttpBackend;
use crate::domain::query::{GamesQuery, ListQuery};
use crate::utils::error::Result;
use serde::de::DeserializeOwned;

use super::{path_id, RawgClient};

impl<B: HttpBackend> RawgClient<B> {
    /// `GET /games`
    pub async fn list_games(&self, query: &GamesQuery) -> Result<Page<GameSummary>> {
        tracing::debug!(?query, "Listing games");
        self.get(&["games"], &query.to_query_pairs()).await
    }

    /// Pages through `GET /games`, starting at the query's page.
    pub fn games_pager(&self, query: &GamesQuery) -> Result<Pager<'_, B, GameSummary>> {
        Pager::new(self, &["games"], &query.to_query_pairs())
    }

    /// Every game matching `query`, up to `max_pages` pages.
    pub async fn all_games(
        &self,
        query: &GamesQuery,
        max_pages: usize,
    ) -> Result<Vec<GameSummary>> {
        self.games_pager(query)?.collect_all(max_pages).await
    }

    /// `GET /games/{id}`
    pub async fn game(&self, game: impl Into<GameRef>) -> Result<GameDetails> {
        let game: GameRef = game.into();
        let id = path_id("game", &game.as_path_segment())?;
        self.get(&["games", &id], &[]).await
    }

    async fn game_relation<T: DeserializeOwned + Send>(
        &self,
        game: GameRef,
        relation: &str,
        query: &ListQuery,
    ) -> Result<Page<T>> {
        let id = path_id("game", &game.as_path_segment())?;
        self.get(&["games", &id, relation], &query.to_query_pairs())
            .await
    }

    /// `GET /games/{id}/screenshots`
    pub async fn game_screenshots(
        &self,
        game: impl Into<GameRef>,
        query: &ListQuery,
    ) -> Result<Page<Screenshot>> {
        self.game_relation(game.into(), "screenshots", query).await
    }

    /// `GET /games/{id}/movies`. Trailers are not paginated.
    pub async fn game_movies(&self, game: impl Into<GameRef>) -> Result<Page<Movie>> {
        self.game_relation(game.into(), "movies", &ListQuery::new()).await
    }

    /// DLCs, editions and other additions of a game.
    pub async fn game_additions(
        &self,
        game: impl Into<GameRef>,
        query: &ListQuery,
    ) -> Result<Page<GameSummary>> {
        self.game_relation(game.into(), "additions", query).await
    }

    /// Other games of the same series.
    pub async fn game_series(
        &self,
        game: impl Into<GameRef>,
        query: &ListQuery,
    ) -> Result<Page<GameSummary>> {
        self.game_relation(game.into(), "game-series", query).await
    }

    /// Base games of an addition.
    pub async fn game_parents(
        &self,
        game: impl Into<GameRef>,
        query: &ListQuery,
    ) -> Result<Page<GameSummary>> {
        self.game_relation(game.into(), "parent-games", query).await
    }

    pub async fn game_stores(
        &self,
        game: impl Into<GameRef>,
        query: &ListQuery,
    ) -> Result<Page<GameStoreLink>> {
        self.game_relation(game.into(), "stores", query).await
    }

    pub async fn game_achievements(
        &self,
        game: impl Into<GameRef>,
        query: &ListQuery,
    ) -> Result<Page<Achievement>> {
        self.game_relation(game.into(), "achievements", query).await
    }

    pub async fn game_development_team(
        &self,
        game: impl Into<GameRef>,
        query: &ListQuery,
    ) -> Result<Page<NamedResource>> {
        self.game_relation(game.into(), "development-team", query).await
    }
}
