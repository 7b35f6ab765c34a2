//! Generic list/detail/create/update/delete wiring shared by every entity.
//!
//! Invalidation rules live here so they are identical across entities:
//! create/update/delete drop the list prefix, update/delete also drop the
//! affected detail key.

use std::{marker::PhantomData, sync::Arc};

use models::models::page::{IdResponse, Page};
use serde::{Serialize, de::DeserializeOwned};

use super::{
    api_client::ApiClient,
    api_error::ApiError,
    mutation::{Mutation, MutationContext, MutationOptions},
    notification::Notifier,
    query_cache::{QueryCache, QueryOptions, QueryResult},
    query_key::{Entity, QueryKey},
};

pub trait ListResource: Send + Sync + 'static {
    const ENTITY: Entity;
    /// Collection path relative to the API base, e.g. `/banners`.
    const PATH: &'static str;

    type Summary: DeserializeOwned + Send + Sync + 'static;
    type ListParams: Serialize + Send + Sync + 'static;
}

pub trait Resource: ListResource {
    type Detail: DeserializeOwned + Send + Sync + 'static;
    /// Body shared by create and update.
    type Form: Serialize + Clone + Default + Send + Sync + 'static;

    fn form_defaults(detail: &Self::Detail) -> Self::Form;
}

pub fn item_path(collection: &str, id: i64) -> String {
    format!("{collection}/{id}")
}

/// Everything a hook needs: the client for requests, the shared cache, and
/// the toast sink for mutation effects.
#[derive(Clone)]
pub struct HookContext {
    pub client: ApiClient,
    pub cache: QueryCache,
    pub notifier: Arc<dyn Notifier>,
    pub query_options: QueryOptions,
}

impl HookContext {
    pub fn mutation_context(&self) -> MutationContext {
        MutationContext {
            cache: self.cache.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

/// Typed HTTP calls for one entity. Errors pass through untouched.
pub struct ResourceService<R> {
    client: ApiClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R> ResourceService<R> {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            _resource: PhantomData,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }
}

impl<R: ListResource> ResourceService<R> {
    pub async fn list(&self, params: &R::ListParams) -> Result<Page<R::Summary>, ApiError> {
        self.client.get_with_query(R::PATH, params).await
    }
}

impl<R: Resource> ResourceService<R> {
    pub async fn detail(&self, id: i64) -> Result<R::Detail, ApiError> {
        self.client.get(&item_path(R::PATH, id)).await
    }

    pub async fn create(&self, form: &R::Form) -> Result<IdResponse, ApiError> {
        self.client.post(R::PATH, form).await
    }

    pub async fn update(&self, id: i64, form: &R::Form) -> Result<IdResponse, ApiError> {
        self.client.put(&item_path(R::PATH, id), form).await
    }

    pub async fn delete(&self, id: i64) -> Result<IdResponse, ApiError> {
        self.client.delete(&item_path(R::PATH, id)).await
    }
}

pub struct ResourceHooks<R> {
    ctx: HookContext,
    service: ResourceService<R>,
}

impl<R> Clone for ResourceHooks<R> {
    fn clone(&self) -> Self {
        Self {
            ctx: self.ctx.clone(),
            service: self.service.clone(),
        }
    }
}

impl<R> ResourceHooks<R> {
    pub fn new(ctx: HookContext) -> Self {
        let service = ResourceService::new(ctx.client.clone());
        Self { ctx, service }
    }

    pub fn context(&self) -> &HookContext {
        &self.ctx
    }

    pub fn service(&self) -> &ResourceService<R> {
        &self.service
    }
}

impl<R: ListResource> ResourceHooks<R> {
    pub async fn list(&self, params: &R::ListParams) -> QueryResult<Page<R::Summary>> {
        self.list_with(params, &self.ctx.query_options).await
    }

    pub async fn list_with(
        &self,
        params: &R::ListParams,
        options: &QueryOptions,
    ) -> QueryResult<Page<R::Summary>> {
        self.ctx
            .cache
            .query(QueryKey::list(R::ENTITY, params), options, || {
                self.service.list(params)
            })
            .await
    }
}

impl<R: Resource> ResourceHooks<R> {
    /// `None` means "no record selected yet" and never touches the network.
    pub async fn detail(&self, id: Option<i64>) -> QueryResult<R::Detail> {
        let Some(id) = id else {
            return QueryResult::idle();
        };
        self.ctx
            .cache
            .query(
                QueryKey::detail(R::ENTITY, id),
                &self.ctx.query_options,
                || self.service.detail(id),
            )
            .await
    }

    pub fn create(
        &self,
        options: MutationOptions<R::Form, IdResponse>,
    ) -> Mutation<R::Form, IdResponse> {
        let service = self.service.clone();
        Mutation::builder(self.ctx.mutation_context(), move |form: R::Form| {
            let service = service.clone();
            async move { service.create(&form).await }
        })
        .invalidate(|_, _| vec![QueryKey::lists(R::ENTITY)])
        .options(options)
        .build()
    }

    pub fn update(
        &self,
        options: MutationOptions<(i64, R::Form), IdResponse>,
    ) -> Mutation<(i64, R::Form), IdResponse> {
        let service = self.service.clone();
        Mutation::builder(
            self.ctx.mutation_context(),
            move |(id, form): (i64, R::Form)| {
                let service = service.clone();
                async move { service.update(id, &form).await }
            },
        )
        .invalidate(|(id, _), _| {
            vec![QueryKey::lists(R::ENTITY), QueryKey::detail(R::ENTITY, *id)]
        })
        .options(options)
        .build()
    }

    pub fn delete(&self, options: MutationOptions<i64, IdResponse>) -> Mutation<i64, IdResponse> {
        let service = self.service.clone();
        Mutation::builder(self.ctx.mutation_context(), move |id: i64| {
            let service = service.clone();
            async move { service.delete(id).await }
        })
        .invalidate(|id, _| vec![QueryKey::lists(R::ENTITY), QueryKey::detail(R::ENTITY, *id)])
        .options(options)
        .build()
    }

    /// Mutation for an owner↔member relationship. Only the owner's detail is
    /// invalidated, and it is invalidated after failures too: a multi-request
    /// change can be partly applied on the server before it errors.
    pub(crate) fn relationship<V, F, Fut>(
        &self,
        owner_of: fn(&V) -> i64,
        options: MutationOptions<V, IdResponse>,
        call: F,
    ) -> Mutation<V, IdResponse>
    where
        V: Clone + Send + Sync + 'static,
        F: Fn(ResourceService<R>, V) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<IdResponse, ApiError>> + Send + 'static,
    {
        let service = self.service.clone();
        Mutation::builder(self.ctx.mutation_context(), move |vars: V| {
            call(service.clone(), vars)
        })
        .invalidate_settled(move |vars| vec![QueryKey::detail(R::ENTITY, owner_of(vars))])
        .options(options)
        .build()
    }
}
