//! User inquiries. The inbox is cursor-paginated and only ever answered,
//! never created or edited from the admin side.

use models::models::{
    help::{HelpAnswerRequest, HelpDetail, HelpListParams, HelpSummary},
    page::{CursorPage, IdResponse},
};
use serde::Serialize;

use super::{
    api_client::ApiClient,
    api_error::ApiError,
    infinite_query::InfiniteQuery,
    mutation::{Mutation, MutationOptions},
    query_cache::QueryResult,
    query_key::{Entity, QueryKey},
    resource::{HookContext, item_path},
};

const HELPS_PATH: &str = "/helps";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CursorQuery<'a> {
    #[serde(flatten)]
    params: &'a HelpListParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<i64>,
}

#[derive(Clone)]
pub struct HelpService {
    client: ApiClient,
}

impl HelpService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(
        &self,
        params: &HelpListParams,
        cursor: Option<i64>,
    ) -> Result<CursorPage<HelpSummary>, ApiError> {
        self.client
            .get_with_query(HELPS_PATH, &CursorQuery { params, cursor })
            .await
    }

    pub async fn detail(&self, id: i64) -> Result<HelpDetail, ApiError> {
        self.client.get(&item_path(HELPS_PATH, id)).await
    }

    /// `POST /helps/{id}/answer`.
    pub async fn answer(&self, id: i64, answer: &HelpAnswerRequest) -> Result<IdResponse, ApiError> {
        let path = format!("{}/answer", item_path(HELPS_PATH, id));
        self.client.post(&path, answer).await
    }
}

#[derive(Clone)]
pub struct HelpHooks {
    ctx: HookContext,
    service: HelpService,
}

impl HelpHooks {
    pub fn new(ctx: HookContext) -> Self {
        let service = HelpService::new(ctx.client.clone());
        Self { ctx, service }
    }

    pub fn service(&self) -> &HelpService {
        &self.service
    }

    pub fn list(&self, params: HelpListParams) -> InfiniteQuery<HelpSummary> {
        let service = self.service.clone();
        let key = QueryKey::list(Entity::Help, &params);
        InfiniteQuery::new(
            self.ctx.cache.clone(),
            key,
            self.ctx.query_options.clone(),
            move |cursor| {
                let service = service.clone();
                let params = params.clone();
                async move { service.list(&params, cursor).await }
            },
        )
    }

    pub async fn detail(&self, id: Option<i64>) -> QueryResult<HelpDetail> {
        let Some(id) = id else {
            return QueryResult::idle();
        };
        self.ctx
            .cache
            .query(
                QueryKey::detail(Entity::Help, id),
                &self.ctx.query_options,
                || self.service.detail(id),
            )
            .await
    }

    pub fn answer(
        &self,
        options: MutationOptions<(i64, HelpAnswerRequest), IdResponse>,
    ) -> Mutation<(i64, HelpAnswerRequest), IdResponse> {
        let service = self.service.clone();
        Mutation::builder(
            self.ctx.mutation_context(),
            move |(id, answer): (i64, HelpAnswerRequest)| {
                let service = service.clone();
                async move { service.answer(id, &answer).await }
            },
        )
        .invalidate(|(id, _), _| vec![QueryKey::lists(Entity::Help), QueryKey::detail(Entity::Help, *id)])
        .options(options)
        .build()
    }
}
