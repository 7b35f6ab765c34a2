//! Composition root: one transport, one auth context, one cache, shared by
//! every entity's hooks.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use super::{
    alcohol::AlcoholHooks,
    api_client::ApiClient,
    api_error::ApiError,
    auth::{AuthContext, SessionState, TokenStore, TokenStoreError},
    banner::BannerHooks,
    config::ClientConfig,
    curation::CurationHooks,
    distillery::DistilleryHooks,
    help::HelpHooks,
    notification::Notifier,
    query_cache::{QueryCache, QueryOptions},
    region::RegionHooks,
    resource::{HookContext, ResourceHooks},
    tasting_tag::TastingTagHooks,
    transport::{ReqwestTransport, TransportError},
};

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
}

#[derive(Clone)]
pub struct AdminClient {
    ctx: HookContext,
}

impl AdminClient {
    pub fn new(
        client: ApiClient,
        cache: QueryCache,
        notifier: Arc<dyn Notifier>,
        query_options: QueryOptions,
    ) -> Self {
        Self {
            ctx: HookContext {
                client,
                cache,
                notifier,
                query_options,
            },
        }
    }

    /// Builds the production stack from `config` and restores any persisted
    /// session from `store`.
    pub async fn connect(
        config: &ClientConfig,
        store: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ConnectError> {
        let transport = Arc::new(ReqwestTransport::new(config.request_timeout())?);
        let auth = Arc::new(AuthContext::new(store));
        let state = auth.init().await?;
        info!(base_url = %config.base_url, ?state, "admin client ready");

        let client = ApiClient::new(config.base_url.clone(), transport, auth);
        Ok(Self::new(
            client,
            QueryCache::new(config.cache_capacity),
            notifier,
            config.query_options(),
        ))
    }

    pub fn client(&self) -> &ApiClient {
        &self.ctx.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.ctx.cache
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.ctx.notifier
    }

    pub fn auth(&self) -> &Arc<AuthContext> {
        self.ctx.client.auth()
    }

    pub fn session(&self) -> SessionState {
        self.auth().state()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.ctx.client.login(email, password).await?;
        self.ctx.cache.clear();
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.ctx.cache.clear();
        self.ctx.client.logout().await
    }

    pub fn banners(&self) -> BannerHooks {
        ResourceHooks::new(self.ctx.clone())
    }

    pub fn curations(&self) -> CurationHooks {
        ResourceHooks::new(self.ctx.clone())
    }

    pub fn tasting_tags(&self) -> TastingTagHooks {
        ResourceHooks::new(self.ctx.clone())
    }

    pub fn alcohols(&self) -> AlcoholHooks {
        ResourceHooks::new(self.ctx.clone())
    }

    pub fn regions(&self) -> RegionHooks {
        ResourceHooks::new(self.ctx.clone())
    }

    pub fn distilleries(&self) -> DistilleryHooks {
        ResourceHooks::new(self.ctx.clone())
    }

    pub fn helps(&self) -> HelpHooks {
        HelpHooks::new(self.ctx.clone())
    }
}

#[cfg(test)]
mod tests {
    use models::models::banner::BannerListParams;
    use serde_json::json;

    use super::*;
    use crate::services::{
        query_key::{Entity, QueryKey},
        test_support::{MockBackend, admin_client, ok, page},
    };

    #[tokio::test]
    async fn logout_drops_cached_data_and_session() {
        let backend = MockBackend::new(|_| ok(page(json!([]))));
        let (admin, _) = admin_client(backend.clone()).await;

        let params = BannerListParams::default();
        let key = QueryKey::list(Entity::Banner, &params);
        admin.banners().list(&params).await;
        assert!(admin.cache().contains(&key));

        admin.logout().await.unwrap();
        assert!(!admin.cache().contains(&key));
        assert_eq!(admin.session(), SessionState::Anonymous);
        assert_eq!(admin.auth().access_token().await, None);
    }
}
