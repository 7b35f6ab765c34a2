//! Scripted backend and recording collaborators for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use models::models::auth::TokenPair;
use serde_json::{Value, json};

use super::{
    admin::AdminClient,
    api_client::ApiClient,
    auth::{AuthContext, MemoryTokenStore},
    notification::{Notifier, Toast},
    query_cache::{QueryCache, QueryOptions},
    transport::{HttpRequest, HttpResponse, Transport, TransportError},
};

pub const BASE_PATH: &str = "/admin/api/v1";
pub const BASE_URL: &str = "http://admin.test/admin/api/v1";

type Handler = Box<dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync>;

struct MockInner {
    handler: Handler,
    requests: Mutex<Vec<HttpRequest>>,
    offline: bool,
}

#[derive(Clone)]
pub struct MockBackend {
    inner: Arc<MockInner>,
}

impl MockBackend {
    pub fn new(handler: impl Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(MockInner {
                handler: Box::new(handler),
                requests: Mutex::new(Vec::new()),
                offline: false,
            }),
        }
    }

    pub fn offline() -> Self {
        Self {
            inner: Arc::new(MockInner {
                handler: Box::new(|_| ok(Value::Null)),
                requests: Mutex::new(Vec::new()),
                offline: true,
            }),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.inner.requests.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<HttpRequest> {
        self.inner.requests.lock().unwrap().last().cloned()
    }

    /// Requests whose method matches and whose path, relative to the API base, equals `path`.
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method.to_string() == method && relative_path(r) == path)
            .count()
    }

    pub fn total(&self) -> usize {
        self.inner.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockBackend {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        if self.inner.offline {
            return Err(TransportError::Connect("connection refused".into()));
        }
        self.inner.requests.lock().unwrap().push(request.clone());
        Ok((self.inner.handler)(&request))
    }
}

pub fn relative_path(request: &HttpRequest) -> &str {
    let path = request.url.path();
    path.strip_prefix(BASE_PATH).unwrap_or(path)
}

pub fn query_param(request: &HttpRequest, name: &str) -> Option<String> {
    request
        .url
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}

pub fn ok(data: Value) -> HttpResponse {
    HttpResponse {
        status: 200,
        body: json!({ "success": true, "code": 200, "data": data, "errors": [], "meta": {} })
            .to_string(),
    }
}

pub fn fail(status: u16, code: &str, message: &str) -> HttpResponse {
    HttpResponse {
        status,
        body: json!({
            "success": false,
            "code": status,
            "data": null,
            "errors": [{ "code": code, "message": message }],
            "meta": {}
        })
        .to_string(),
    }
}

pub fn page(items: Value) -> Value {
    let total = items.as_array().map(Vec::len).unwrap_or(0);
    json!({
        "items": items,
        "meta": { "page": 0, "size": 20, "totalElements": total, "totalPages": 1, "hasNext": false }
    })
}

pub async fn authed_client(backend: MockBackend) -> ApiClient {
    let store = Arc::new(MemoryTokenStore::with_tokens(TokenPair {
        access_token: "access-1".into(),
        refresh_token: "refresh-1".into(),
    }));
    let auth = Arc::new(AuthContext::new(store));
    auth.init().await.unwrap();
    ApiClient::new(BASE_URL, Arc::new(backend), auth)
}

pub async fn admin_client(backend: MockBackend) -> (AdminClient, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::default());
    let client = authed_client(backend).await;
    let admin = AdminClient::new(
        client,
        QueryCache::default(),
        notifier.clone(),
        QueryOptions::default().retry(0),
    );
    (admin, notifier)
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn show_toast(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}
