//! Write wrapper with ordered side effects.
//!
//! Every `mutate` call runs request → cache invalidation → toast → status
//! update → caller callback. The order lives in the effect list built by
//! [`MutationBuilder::build`]; built-ins run before the status changes, so a
//! callback already observes `Success`/`Error`.

use std::{future::Future, sync::Arc};

use async_trait::async_trait;
use futures::{FutureExt, future::BoxFuture};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, warn};

use super::{
    api_error::ApiError,
    notification::{Notifier, Toast},
    query_cache::QueryCache,
    query_key::QueryKey,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationStatus {
    Idle,
    Pending,
    Success,
    Error,
}

/// Shared collaborators every effect may touch.
#[derive(Clone)]
pub struct MutationContext {
    pub cache: QueryCache,
    pub notifier: Arc<dyn Notifier>,
}

#[async_trait]
pub trait MutationEffect<V, R>: Send + Sync
where
    V: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    async fn on_success(&self, _ctx: &MutationContext, _data: &R, _vars: &V) {}

    async fn on_error(&self, _ctx: &MutationContext, _error: &ApiError, _vars: &V) {}
}

type KeysFn<V, R> = Box<dyn Fn(&V, &R) -> Vec<QueryKey> + Send + Sync>;
type SettledKeysFn<V> = Box<dyn Fn(&V) -> Vec<QueryKey> + Send + Sync>;
type SuccessFn<V, R> = Box<dyn Fn(&R, &V) + Send + Sync>;
type ErrorFn<V> = Box<dyn Fn(&ApiError, &V) + Send + Sync>;
type MutationFn<V, R> = Box<dyn Fn(V) -> BoxFuture<'static, Result<R, ApiError>> + Send + Sync>;

struct InvalidateEffect<V, R> {
    keys: Vec<KeysFn<V, R>>,
    settled: Vec<SettledKeysFn<V>>,
}

impl<V, R> InvalidateEffect<V, R> {
    async fn invalidate_all(&self, ctx: &MutationContext, keys: Vec<QueryKey>) {
        for key in keys {
            ctx.cache.invalidate(&key).await;
        }
    }
}

#[async_trait]
impl<V, R> MutationEffect<V, R> for InvalidateEffect<V, R>
where
    V: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    async fn on_success(&self, ctx: &MutationContext, data: &R, vars: &V) {
        let keys = self
            .keys
            .iter()
            .flat_map(|f| f(vars, data))
            .chain(self.settled.iter().flat_map(|f| f(vars)))
            .collect();
        self.invalidate_all(ctx, keys).await;
    }

    async fn on_error(&self, ctx: &MutationContext, _error: &ApiError, vars: &V) {
        let keys = self.settled.iter().flat_map(|f| f(vars)).collect();
        self.invalidate_all(ctx, keys).await;
    }
}

struct NotifyEffect {
    success_message: Option<String>,
    notify_errors: bool,
}

#[async_trait]
impl<V, R> MutationEffect<V, R> for NotifyEffect
where
    V: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    async fn on_success(&self, ctx: &MutationContext, _data: &R, _vars: &V) {
        if let Some(message) = &self.success_message {
            ctx.notifier.show_toast(Toast::success(message.clone()));
        }
    }

    async fn on_error(&self, ctx: &MutationContext, error: &ApiError, _vars: &V) {
        if self.notify_errors {
            ctx.notifier.show_toast(Toast::error(error.message.clone()));
        }
    }
}

struct CallbackEffect<V, R> {
    on_success: Option<SuccessFn<V, R>>,
    on_error: Option<ErrorFn<V>>,
}

#[async_trait]
impl<V, R> MutationEffect<V, R> for CallbackEffect<V, R>
where
    V: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    async fn on_success(&self, _ctx: &MutationContext, data: &R, vars: &V) {
        if let Some(callback) = &self.on_success {
            callback(data, vars);
        }
    }

    async fn on_error(&self, _ctx: &MutationContext, error: &ApiError, vars: &V) {
        if let Some(callback) = &self.on_error {
            callback(error, vars);
        }
    }
}

/// Caller-facing knobs for one mutation instance.
pub struct MutationOptions<V, R> {
    pub success_message: Option<String>,
    pub suppress_error_toast: bool,
    on_success: Option<SuccessFn<V, R>>,
    on_error: Option<ErrorFn<V>>,
}

impl<V, R> Default for MutationOptions<V, R> {
    fn default() -> Self {
        Self {
            success_message: None,
            suppress_error_toast: false,
            on_success: None,
            on_error: None,
        }
    }
}

impl<V, R> MutationOptions<V, R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }

    pub fn suppress_error_toast(mut self) -> Self {
        self.suppress_error_toast = true;
        self
    }

    pub fn on_success(mut self, callback: impl Fn(&R, &V) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&ApiError, &V) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }
}

pub struct MutationBuilder<V, R> {
    ctx: MutationContext,
    mutation_fn: MutationFn<V, R>,
    invalidations: Vec<KeysFn<V, R>>,
    settled_invalidations: Vec<SettledKeysFn<V>>,
    options: MutationOptions<V, R>,
}

impl<V, R> MutationBuilder<V, R>
where
    V: Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    /// Keys returned here are invalidated after every successful call.
    pub fn invalidate(
        mut self,
        keys: impl Fn(&V, &R) -> Vec<QueryKey> + Send + Sync + 'static,
    ) -> Self {
        self.invalidations.push(Box::new(keys));
        self
    }

    /// Keys returned here are invalidated after every call, failed ones
    /// included. For writes that may partially apply before erroring.
    pub fn invalidate_settled(mut self, keys: impl Fn(&V) -> Vec<QueryKey> + Send + Sync + 'static) -> Self {
        self.settled_invalidations.push(Box::new(keys));
        self
    }

    pub fn options(mut self, options: MutationOptions<V, R>) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> Mutation<V, R> {
        let MutationOptions {
            success_message,
            suppress_error_toast,
            on_success,
            on_error,
        } = self.options;

        let mut effects: Vec<Box<dyn MutationEffect<V, R>>> = Vec::new();
        if !self.invalidations.is_empty() || !self.settled_invalidations.is_empty() {
            effects.push(Box::new(InvalidateEffect {
                keys: self.invalidations,
                settled: self.settled_invalidations,
            }));
        }
        effects.push(Box::new(NotifyEffect {
            success_message,
            notify_errors: !suppress_error_toast,
        }));

        let (status, _) = watch::channel(MutationStatus::Idle);
        Mutation {
            inner: Arc::new(MutationInner {
                ctx: self.ctx,
                mutation_fn: self.mutation_fn,
                effects,
                callbacks: CallbackEffect {
                    on_success,
                    on_error,
                },
                status,
            }),
        }
    }
}

struct MutationInner<V, R> {
    ctx: MutationContext,
    mutation_fn: MutationFn<V, R>,
    effects: Vec<Box<dyn MutationEffect<V, R>>>,
    callbacks: CallbackEffect<V, R>,
    status: watch::Sender<MutationStatus>,
}

/// A reusable write operation. Cloning shares status and effects.
pub struct Mutation<V, R> {
    inner: Arc<MutationInner<V, R>>,
}

impl<V, R> Clone for Mutation<V, R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Completion handle for a spawned `mutate` call. Dropping it does not cancel
/// the mutation.
pub struct MutationHandle<R> {
    join: JoinHandle<Result<R, ApiError>>,
}

impl<R> MutationHandle<R> {
    pub async fn wait(self) -> Result<R, ApiError> {
        self.join
            .await
            .unwrap_or_else(|e| Err(ApiError::unknown(format!("mutation task failed: {e}"))))
    }
}

impl<V, R> Mutation<V, R>
where
    V: Clone + Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    pub fn builder<F, Fut>(ctx: MutationContext, mutation_fn: F) -> MutationBuilder<V, R>
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ApiError>> + Send + 'static,
    {
        MutationBuilder {
            ctx,
            mutation_fn: Box::new(move |vars| mutation_fn(vars).boxed()),
            invalidations: Vec::new(),
            settled_invalidations: Vec::new(),
            options: MutationOptions::default(),
        }
    }

    /// Starts the mutation on the runtime; it runs to completion and fires its
    /// callbacks even if the returned handle is dropped.
    pub fn mutate(&self, vars: V) -> MutationHandle<R> {
        let inner = self.inner.clone();
        MutationHandle {
            join: tokio::spawn(async move { inner.run(vars).await }),
        }
    }

    pub async fn mutate_async(&self, vars: V) -> Result<R, ApiError> {
        self.mutate(vars).wait().await
    }

    pub fn status(&self) -> MutationStatus {
        *self.inner.status.borrow()
    }

    pub fn is_pending(&self) -> bool {
        self.status() == MutationStatus::Pending
    }

    pub fn is_success(&self) -> bool {
        self.status() == MutationStatus::Success
    }

    pub fn is_error(&self) -> bool {
        self.status() == MutationStatus::Error
    }
}

impl<V, R> MutationInner<V, R>
where
    V: Clone + Send + Sync + 'static,
    R: Send + Sync + 'static,
{
    async fn run(&self, vars: V) -> Result<R, ApiError> {
        self.status.send_replace(MutationStatus::Pending);
        let result = (self.mutation_fn)(vars.clone()).await;

        match &result {
            Ok(data) => {
                for effect in &self.effects {
                    effect.on_success(&self.ctx, data, &vars).await;
                }
                self.status.send_replace(MutationStatus::Success);
                debug!("mutation succeeded");
                self.callbacks.on_success(&self.ctx, data, &vars).await;
            }
            Err(error) => {
                warn!(kind = %error.kind, code = %error.code, "mutation failed");
                for effect in &self.effects {
                    effect.on_error(&self.ctx, error, &vars).await;
                }
                self.status.send_replace(MutationStatus::Error);
                self.callbacks.on_error(&self.ctx, error, &vars).await;
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use serde_json::json;

    use super::*;
    use crate::services::{
        api_error::ErrorKind,
        notification::ToastKind,
        query_key::Entity,
        test_support::RecordingNotifier,
    };

    fn context(notifier: &Arc<RecordingNotifier>) -> MutationContext {
        MutationContext {
            cache: QueryCache::default(),
            notifier: notifier.clone(),
        }
    }

    #[tokio::test]
    async fn effects_run_in_order_before_caller_callback() {
        let notifier = Arc::new(RecordingNotifier::default());
        let ctx = context(&notifier);
        let list_key = QueryKey::list(Entity::TastingTag, &json!({}));
        ctx.cache.set_data(list_key.clone(), 1_i64, Duration::from_secs(60)).await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let cache = ctx.cache.clone();
        let seen_notifier = notifier.clone();
        let seen_log = seen.clone();
        let cached_key = list_key.clone();

        let mutation = Mutation::builder(ctx, |name: String| async move { Ok(name.len()) })
            .invalidate(|_, _| vec![QueryKey::lists(Entity::TastingTag)])
            .options(
                MutationOptions::new()
                    .success_message("태그가 등록되었습니다.")
                    .on_success(move |len: &usize, name: &String| {
                        // Cache is already invalidated and the toast already shown.
                        let cached = cache.contains(&cached_key);
                        seen_log.lock().unwrap().push((
                            *len,
                            name.clone(),
                            cached,
                            seen_notifier.toasts().len(),
                        ));
                    }),
            )
            .build();

        let len = mutation.mutate_async("바닐라".to_string()).await.unwrap();

        assert_eq!(len, "바닐라".len());
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[(len, "바닐라".to_string(), false, 1)]
        );
        assert_eq!(notifier.toasts()[0], Toast::success("태그가 등록되었습니다."));
        assert!(mutation.is_success());
    }

    #[tokio::test]
    async fn failure_fires_only_error_callback_and_toast() {
        let notifier = Arc::new(RecordingNotifier::default());
        let successes = Arc::new(Mutex::new(0));
        let errors = Arc::new(Mutex::new(Vec::new()));
        let (s, e) = (successes.clone(), errors.clone());

        let mutation = Mutation::builder(context(&notifier), |_: i64| async {
            Err::<(), _>(ApiError::new(
                ErrorKind::Validation,
                "DUPLICATE_NAME",
                "이미 존재하는 태그명입니다.",
            ))
        })
        .options(
            MutationOptions::new()
                .on_success(move |_, _| *s.lock().unwrap() += 1)
                .on_error(move |err: &ApiError, id: &i64| e.lock().unwrap().push((err.code.clone(), *id))),
        )
        .build();

        let err = mutation.mutate_async(3).await.unwrap_err();

        assert_eq!(err.code, "DUPLICATE_NAME");
        assert!(mutation.is_error());
        assert_eq!(*successes.lock().unwrap(), 0);
        assert_eq!(errors.lock().unwrap().as_slice(), &[("DUPLICATE_NAME".to_string(), 3)]);
        let toasts = notifier.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[0].message, "이미 존재하는 태그명입니다.");
    }

    #[tokio::test]
    async fn callbacks_observe_the_final_status() {
        let notifier = Arc::new(RecordingNotifier::default());
        let slot: Arc<Mutex<Option<Mutation<bool, ()>>>> = Arc::new(Mutex::new(None));
        let observed = Arc::new(Mutex::new(Vec::new()));
        let (ok_slot, err_slot) = (slot.clone(), slot.clone());
        let (ok_seen, err_seen) = (observed.clone(), observed.clone());

        let mutation = Mutation::builder(context(&notifier), |succeed: bool| async move {
            if succeed { Ok(()) } else { Err(ApiError::network()) }
        })
        .options(
            MutationOptions::new()
                .suppress_error_toast()
                .on_success(move |_, _| {
                    let status = ok_slot.lock().unwrap().as_ref().map(Mutation::status);
                    ok_seen.lock().unwrap().push(status);
                })
                .on_error(move |_, _| {
                    let status = err_slot.lock().unwrap().as_ref().map(Mutation::status);
                    err_seen.lock().unwrap().push(status);
                }),
        )
        .build();
        *slot.lock().unwrap() = Some(mutation.clone());

        mutation.mutate_async(true).await.unwrap();
        mutation.mutate_async(false).await.unwrap_err();

        assert_eq!(
            observed.lock().unwrap().as_slice(),
            &[Some(MutationStatus::Success), Some(MutationStatus::Error)]
        );
        slot.lock().unwrap().take();
    }

    #[tokio::test]
    async fn settled_keys_are_invalidated_on_failure_too() {
        let notifier = Arc::new(RecordingNotifier::default());
        let ctx = context(&notifier);
        let hour = Duration::from_secs(3600);
        let detail = QueryKey::detail(Entity::Curation, 7);
        let lists = QueryKey::list(Entity::Curation, &json!({}));
        ctx.cache.set_data(detail.clone(), 1_i64, hour).await;
        ctx.cache.set_data(lists.clone(), 2_i64, hour).await;
        let cache = ctx.cache.clone();

        let mutation = Mutation::builder(ctx, |_: i64| async {
            Err::<(), _>(ApiError::new(ErrorKind::Server, "HTTP_500", "서버 오류가 발생했습니다."))
        })
        .invalidate(|_, _| vec![QueryKey::lists(Entity::Curation)])
        .invalidate_settled(|id| vec![QueryKey::detail(Entity::Curation, *id)])
        .build();

        assert!(mutation.mutate_async(7).await.is_err());
        assert!(!cache.contains(&detail));
        assert!(cache.contains(&lists));
    }

    #[tokio::test]
    async fn suppressed_error_toast() {
        let notifier = Arc::new(RecordingNotifier::default());
        let mutation = Mutation::builder(context(&notifier), |_: ()| async {
            Err::<(), _>(ApiError::network())
        })
        .options(MutationOptions::new().suppress_error_toast())
        .build();

        assert!(mutation.mutate_async(()).await.is_err());
        assert!(notifier.toasts().is_empty());
    }

    #[tokio::test]
    async fn dropped_handle_still_completes() {
        let notifier = Arc::new(RecordingNotifier::default());
        let (tx, rx) = tokio::sync::oneshot::channel();
        let tx = Mutex::new(Some(tx));

        let mutation = Mutation::builder(context(&notifier), |v: i64| async move {
            tokio::task::yield_now().await;
            Ok(v * 2)
        })
        .options(MutationOptions::new().on_success(move |r: &i64, _| {
            if let Some(tx) = tx.lock().unwrap().take() {
                let _ = tx.send(*r);
            }
        }))
        .build();

        drop(mutation.mutate(21));

        assert_eq!(rx.await.unwrap(), 42);
    }

    #[tokio::test]
    async fn concurrent_calls_all_fire_callbacks() {
        let notifier = Arc::new(RecordingNotifier::default());
        let calls = Arc::new(Mutex::new(0));
        let c = calls.clone();
        let mutation = Mutation::builder(context(&notifier), |v: i64| async move { Ok(v) })
            .options(MutationOptions::new().on_success(move |_, _| *c.lock().unwrap() += 1))
            .build();

        let (a, b) = tokio::join!(mutation.mutate_async(1), mutation.mutate_async(2));

        assert_eq!((a.unwrap(), b.unwrap()), (1, 2));
        assert_eq!(*calls.lock().unwrap(), 2);
        assert_eq!(mutation.status(), MutationStatus::Success);
    }
}
