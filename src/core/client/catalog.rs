//! Genres, platforms, developers, publishers, stores, tags and creators.

use crate::core::pagination::Pager;
use crate::core::resources::ResourceKind;
use crate::domain::model::{CreatorRole, NamedResource, Page, ParentPlatform, ResourceDetails};
use crate::domain::ports::HttpBackend;
use crate::domain::query::ListQuery;
use crate::utils::error::Result;

use super::{path_id, RawgClient};

impl<B: HttpBackend> RawgClient<B> {
    /// `GET /{kind}`
    pub async fn list_resources(
        &self,
        kind: ResourceKind,
        query: &ListQuery,
    ) -> Result<Page<NamedResource>> {
        self.get(&[kind.path_segment()], &query.to_query_pairs()).await
    }

    pub fn resources_pager(
        &self,
        kind: ResourceKind,
        query: &ListQuery,
    ) -> Result<Pager<'_, B, NamedResource>> {
        Pager::new(self, &[kind.path_segment()], &query.to_query_pairs())
    }

    /// `GET /{kind}/{id}`; `id_or_slug` may be either.
    pub async fn resource(&self, kind: ResourceKind, id_or_slug: &str) -> Result<ResourceDetails> {
        let id = path_id("id", id_or_slug)?;
        self.get(&[kind.path_segment(), &id], &[]).await
    }

    /// `GET /platforms/lists/parents`
    pub async fn parent_platforms(&self, query: &ListQuery) -> Result<Page<ParentPlatform>> {
        self.get(&["platforms", "lists", "parents"], &query.to_query_pairs()).await
    }

    /// `GET /creator-roles`
    pub async fn creator_roles(&self, query: &ListQuery) -> Result<Page<CreatorRole>> {
        self.get(&["creator-roles"], &query.to_query_pairs()).await
    }
}
