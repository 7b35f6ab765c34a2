//! Cursor-paginated reads stored as one cache entry holding every loaded page.

use std::{future::Future, sync::Arc};

use futures::{FutureExt, future::BoxFuture};
use models::models::page::CursorPage;
use tracing::debug;

use super::{
    api_error::ApiError,
    query_cache::{QueryCache, QueryOptions, QueryResult},
    query_key::QueryKey,
};

type PageFn<T> =
    Arc<dyn Fn(Option<i64>) -> BoxFuture<'static, Result<CursorPage<T>, ApiError>> + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct InfiniteData<T> {
    pub pages: Vec<CursorPage<T>>,
}

impl<T> InfiniteData<T> {
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.pages.iter().flat_map(|page| page.items.iter())
    }

    pub fn has_next_page(&self) -> bool {
        self.pages
            .last()
            .is_some_and(|page| page.meta.has_next && page.meta.cursor.is_some())
    }

    pub fn next_cursor(&self) -> Option<i64> {
        self.pages
            .last()
            .filter(|page| page.meta.has_next)
            .and_then(|page| page.meta.cursor)
    }
}

pub struct InfiniteQuery<T> {
    cache: QueryCache,
    key: QueryKey,
    options: QueryOptions,
    fetch_page: PageFn<T>,
}

impl<T> Clone for InfiniteQuery<T> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            key: self.key.clone(),
            options: self.options.clone(),
            fetch_page: self.fetch_page.clone(),
        }
    }
}

impl<T> InfiniteQuery<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// `fetch_page` receives the cursor of the page to load, `None` for the first.
    pub fn new<F, Fut>(cache: QueryCache, key: QueryKey, options: QueryOptions, fetch_page: F) -> Self
    where
        F: Fn(Option<i64>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<CursorPage<T>, ApiError>> + Send + 'static,
    {
        Self {
            cache,
            key,
            options,
            fetch_page: Arc::new(move |cursor| fetch_page(cursor).boxed()),
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Loads (or serves from cache) everything fetched so far, starting with
    /// the first page.
    pub async fn fetch(&self) -> QueryResult<InfiniteData<T>> {
        self.cache
            .query(self.key.clone(), &self.options, || async {
                let first = (self.fetch_page)(None).await?;
                Ok(InfiniteData { pages: vec![first] })
            })
            .await
    }

    /// Appends the page after the last loaded cursor. When there is no next
    /// page the current data is returned unchanged.
    pub async fn fetch_next_page(&self) -> QueryResult<InfiniteData<T>> {
        let current = match self.cache.get_data::<InfiniteData<T>>(&self.key).await {
            Some(data) => data,
            None => return self.fetch().await,
        };

        let Some(cursor) = current.next_cursor() else {
            return QueryResult::success(current, true);
        };

        debug!(key = %self.key, cursor, "fetching next page");
        match (self.fetch_page)(Some(cursor)).await {
            Ok(page) => {
                let mut pages = current.pages.clone();
                pages.push(page);
                let data = self
                    .cache
                    .set_data(self.key.clone(), InfiniteData { pages }, self.options.stale_time)
                    .await;
                QueryResult::success(data, false)
            }
            Err(error) => QueryResult::error_with_data(error, Some(current)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use models::models::page::CursorMeta;

    use super::*;
    use crate::services::query_key::Entity;

    fn page(items: Vec<i64>, cursor: Option<i64>, has_next: bool) -> CursorPage<i64> {
        CursorPage {
            items,
            meta: CursorMeta { cursor, has_next },
        }
    }

    fn numbers(calls: Arc<AtomicUsize>) -> InfiniteQuery<i64> {
        InfiniteQuery::new(
            QueryCache::default(),
            QueryKey::list(Entity::Help, &serde_json::json!({ "pageSize": 2 })),
            QueryOptions::default(),
            move |cursor| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    Ok(match cursor {
                        None => page(vec![1, 2], Some(2), true),
                        Some(2) => page(vec![3, 4], Some(4), true),
                        Some(4) => page(vec![5], None, false),
                        Some(other) => {
                            return Err(ApiError::unknown(format!("bad cursor {other}")));
                        }
                    })
                }
            },
        )
    }

    #[tokio::test]
    async fn pages_accumulate_until_the_last() {
        let calls = Arc::new(AtomicUsize::new(0));
        let query = numbers(calls.clone());

        let first = query.fetch().await;
        assert_eq!(first.data().unwrap().items().copied().collect::<Vec<_>>(), vec![1, 2]);

        query.fetch_next_page().await;
        let last = query.fetch_next_page().await;
        let data = last.data().unwrap();
        assert_eq!(data.items().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert!(!data.has_next_page());
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let again = query.fetch_next_page().await;
        assert!(again.from_cache);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn cached_pages_survive_a_second_fetch() {
        let calls = Arc::new(AtomicUsize::new(0));
        let query = numbers(calls.clone());
        query.fetch().await;
        query.fetch_next_page().await;

        let result = query.fetch().await;
        assert_eq!(result.data().unwrap().pages.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
