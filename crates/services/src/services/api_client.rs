//! Envelope-aware client for the admin REST API.

use std::sync::Arc;

use models::models::auth::{LoginRequest, RefreshRequest, TokenPair};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use url::Url;
use utils::response::ApiEnvelope;

use super::{
    api_error::{ApiError, Failure, normalize},
    auth::AuthContext,
    transport::{HttpMethod, HttpRequest, HttpResponse, Transport},
};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REFRESH_PATH: &str = "/auth/refresh";

/// A request relative to the API base path.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub authenticated: bool,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            authenticated: true,
        }
    }

    /// Flattens a params struct into query pairs; `None` fields are skipped.
    pub fn with_query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, ApiError> {
        let value = serde_json::to_value(params).map_err(|e| normalize(Failure::Other(e.to_string())))?;
        if let serde_json::Value::Object(map) = value {
            for (key, value) in map {
                match value {
                    serde_json::Value::Null => {}
                    serde_json::Value::String(s) => self.query.push((key, s)),
                    serde_json::Value::Array(items) => {
                        for item in items {
                            self.query.push((key.clone(), query_scalar(item)));
                        }
                    }
                    other => self.query.push((key, query_scalar(other))),
                }
            }
        }
        Ok(self)
    }

    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(
            serde_json::to_value(body).map_err(|e| normalize(Failure::Other(e.to_string())))?,
        );
        Ok(self)
    }

    pub fn anonymous(mut self) -> Self {
        self.authenticated = false;
        self
    }
}

fn query_scalar(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

struct ClientInner {
    base_url: String,
    transport: Arc<dyn Transport>,
    auth: Arc<AuthContext>,
    refresh_lock: Mutex<()>,
}

#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        auth: Arc<AuthContext>,
    ) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                base_url: base_url.into().trim_end_matches('/').to_string(),
                transport,
                auth,
                refresh_lock: Mutex::new(()),
            }),
        }
    }

    pub fn auth(&self) -> &Arc<AuthContext> {
        &self.inner.auth
    }

    /// Sends the request, unwraps the envelope and returns `data`.
    ///
    /// A 401 triggers at most one token refresh followed by a single retry.
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let generation = self.inner.auth.generation();
        let mut response = self.send(&request).await?;

        if response.status == 401 && request.authenticated {
            self.refresh_after_unauthorized(generation).await?;
            response = self.send(&request).await?;
        }

        decode(response)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(ApiRequest::new(HttpMethod::Get, path)).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, params: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.request(ApiRequest::new(HttpMethod::Get, path).with_query(params)?)
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(ApiRequest::new(HttpMethod::Post, path).with_json(body)?)
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(ApiRequest::new(HttpMethod::Put, path).with_json(body)?)
            .await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(ApiRequest::new(HttpMethod::Patch, path).with_json(body)?)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(ApiRequest::new(HttpMethod::Delete, path)).await
    }

    pub async fn delete_with_body<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(ApiRequest::new(HttpMethod::Delete, path).with_json(body)?)
            .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let tokens: TokenPair = self
            .request(
                ApiRequest::new(HttpMethod::Post, LOGIN_PATH)
                    .with_json(&body)?
                    .anonymous(),
            )
            .await?;

        self.inner
            .auth
            .set_tokens(&tokens)
            .await
            .map_err(|e| normalize(Failure::Other(e.to_string())))?;
        info!(email, "logged in");
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.inner
            .auth
            .teardown()
            .await
            .map_err(|e| normalize(Failure::Other(e.to_string())))
    }

    async fn send(&self, request: &ApiRequest) -> Result<HttpResponse, ApiError> {
        let mut url = Url::parse(&format!("{}{}", self.inner.base_url, request.path))
            .map_err(|e| normalize(Failure::Other(e.to_string())))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        let bearer = if request.authenticated {
            self.inner.auth.access_token().await
        } else {
            None
        };

        debug!(method = %request.method, url = %url, "api request");
        let response = self
            .inner
            .transport
            .send(HttpRequest {
                method: request.method,
                url,
                bearer,
                body: request.body.clone(),
            })
            .await
            .map_err(|e| {
                warn!(method = %request.method, path = %request.path, error = %e, "api request failed");
                normalize(Failure::Transport(e))
            })?;
        debug!(status = response.status, path = %request.path, "api response");

        Ok(response)
    }

    /// Single-flight refresh: concurrent 401s wait on one lock and the
    /// latecomers reuse whatever token the first one obtained.
    async fn refresh_after_unauthorized(&self, seen_generation: u64) -> Result<(), ApiError> {
        let _guard = self.inner.refresh_lock.lock().await;
        let auth = &self.inner.auth;

        if auth.generation() != seen_generation {
            return match auth.access_token().await {
                Some(_) => Ok(()),
                None => Err(ApiError::auth_expired()),
            };
        }

        let Some(refresh_token) = auth.refresh_token().await else {
            auth.expire().await;
            return Err(ApiError::auth_expired());
        };

        let body = RefreshRequest { refresh_token };
        let refreshed: Result<TokenPair, ApiError> = async {
            let request = ApiRequest::new(HttpMethod::Post, REFRESH_PATH)
                .with_json(&body)?
                .anonymous();
            decode(self.send(&request).await?)
        }
        .await;

        match refreshed {
            Ok(tokens) => {
                if let Err(e) = auth.set_tokens(&tokens).await {
                    warn!(error = %e, "refreshed tokens could not be persisted");
                }
                info!("access token refreshed");
                Ok(())
            }
            Err(e) => {
                warn!(code = %e.code, "token refresh failed");
                auth.expire().await;
                Err(ApiError::auth_expired())
            }
        }
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    let status = response.status;
    if !response.is_success() {
        return Err(normalize(Failure::Response {
            status,
            body: response.body,
        }));
    }

    let envelope: ApiEnvelope = serde_json::from_str(&response.body).map_err(|e| {
        normalize(Failure::Decode {
            status,
            reason: e.to_string(),
        })
    })?;

    if !envelope.success {
        return Err(normalize(Failure::Envelope { status, envelope }));
    }
    if let Err(violation) = envelope.validate() {
        warn!(%violation, "malformed success envelope");
    }

    serde_json::from_value(envelope.data.unwrap_or(serde_json::Value::Null)).map_err(|e| {
        normalize(Failure::Decode {
            status,
            reason: e.to_string(),
        })
    })
}
