use models::models::{
    banner::{
        BannerDetail, BannerListParams, BannerRequest, BannerStatusRequest, BannerSummary,
        SortOrderRequest,
    },
    page::IdResponse,
};

use super::{
    mutation::{Mutation, MutationOptions},
    query_key::{Entity, QueryKey},
    reorder::{MutationPersister, OrderChange, Reorderable},
    resource::{ListResource, Resource, ResourceHooks, item_path},
};

pub struct Banners;

impl ListResource for Banners {
    const ENTITY: Entity = Entity::Banner;
    const PATH: &'static str = "/banners";

    type Summary = BannerSummary;
    type ListParams = BannerListParams;
}

impl Resource for Banners {
    type Detail = BannerDetail;
    type Form = BannerRequest;

    fn form_defaults(detail: &BannerDetail) -> BannerRequest {
        BannerRequest::from(detail)
    }
}

pub type BannerHooks = ResourceHooks<Banners>;

impl Reorderable for BannerSummary {
    fn id(&self) -> i64 {
        self.id
    }

    fn order(&self) -> i32 {
        self.sort_order
    }

    fn set_order(&mut self, order: i32) {
        self.sort_order = order;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BannerStatusChange {
    pub id: i64,
    pub is_active: bool,
}

impl ResourceHooks<Banners> {
    /// `PATCH /banners/{id}/status`.
    pub fn update_status(
        &self,
        options: MutationOptions<BannerStatusChange, IdResponse>,
    ) -> Mutation<BannerStatusChange, IdResponse> {
        let client = self.service().client().clone();
        Mutation::builder(
            self.context().mutation_context(),
            move |change: BannerStatusChange| {
                let client = client.clone();
                async move {
                    let path = format!("{}/status", item_path(Banners::PATH, change.id));
                    client
                        .patch(&path, &BannerStatusRequest {
                            is_active: change.is_active,
                        })
                        .await
                }
            },
        )
        .invalidate(|change, _| {
            vec![
                QueryKey::lists(Entity::Banner),
                QueryKey::detail(Entity::Banner, change.id),
            ]
        })
        .options(options)
        .build()
    }

    /// `PATCH /banners/{id}/sort-order`. Lists are refreshed by the reorder
    /// persister once a whole drag settles rather than per row.
    pub fn update_sort_order(
        &self,
        options: MutationOptions<OrderChange, IdResponse>,
    ) -> Mutation<OrderChange, IdResponse> {
        let client = self.service().client().clone();
        Mutation::builder(
            self.context().mutation_context(),
            move |change: OrderChange| {
                let client = client.clone();
                async move {
                    let path = format!("{}/sort-order", item_path(Banners::PATH, change.id));
                    client
                        .patch(&path, &SortOrderRequest {
                            sort_order: change.order,
                        })
                        .await
                }
            },
        )
        .invalidate(|change, _| vec![QueryKey::detail(Entity::Banner, change.id)])
        .options(options)
        .build()
    }

    pub fn reorder_persister(&self) -> MutationPersister {
        MutationPersister::new(
            self.update_sort_order(MutationOptions::new().suppress_error_toast()),
            self.context().cache.clone(),
            QueryKey::lists(Entity::Banner),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::{Value, json};

    use super::*;
    use crate::services::{
        api_error::ErrorKind,
        notification::ToastKind,
        reorder::ReorderController,
        test_support::{MockBackend, admin_client, fail, ok, page, relative_path},
        transport::HttpMethod,
    };

    fn banner(id: i64, name: &str, sort_order: i32) -> Value {
        json!({
            "id": id,
            "name": name,
            "bannerType": "AD",
            "sortOrder": sort_order,
            "isActive": true,
            "imageUrl": null,
            "startDate": null,
            "endDate": null
        })
    }

    /// Serves `/banners` from a shared list, applying sort-order PATCHes.
    fn banner_backend(fail_sort_order: bool) -> (MockBackend, Arc<Mutex<Vec<Value>>>) {
        let rows = Arc::new(Mutex::new(vec![
            banner(1, "A", 0),
            banner(2, "B", 1),
            banner(3, "C", 2),
        ]));
        let state = rows.clone();
        let backend = MockBackend::new(move |req| {
            let path = relative_path(req).to_string();
            let mut rows = state.lock().unwrap();
            match (req.method, path.as_str()) {
                (HttpMethod::Get, "/banners") => {
                    let mut sorted = rows.clone();
                    sorted.sort_by_key(|b| b["sortOrder"].as_i64());
                    ok(page(Value::Array(sorted)))
                }
                (HttpMethod::Get, "/banners/1") => ok(rows[0].clone()),
                (HttpMethod::Patch, p) if p.ends_with("/sort-order") => {
                    if fail_sort_order {
                        return fail(500, "INTERNAL", "서버 오류가 발생했습니다.");
                    }
                    let id: i64 = p.trim_start_matches("/banners/").trim_end_matches("/sort-order").parse().unwrap();
                    let order = req.body.as_ref().unwrap()["sortOrder"].clone();
                    if let Some(row) = rows.iter_mut().find(|b| b["id"] == id) {
                        row["sortOrder"] = order;
                    }
                    ok(json!({ "targetId": id }))
                }
                (HttpMethod::Patch, "/banners/1/status") => ok(json!({ "targetId": 1 })),
                _ => fail(404, "BANNER_NOT_FOUND", "배너를 찾을 수 없습니다."),
            }
        });
        (backend, rows)
    }

    fn names(rows: &[BannerSummary]) -> Vec<String> {
        rows.iter().map(|b| b.name.clone()).collect()
    }

    #[tokio::test]
    async fn drag_a_after_b_persists_b_a_c() {
        let (backend, _) = banner_backend(false);
        let (admin, notifier) = admin_client(backend.clone()).await;
        let banners = admin.banners();

        let listed = banners.list(&BannerListParams::default()).await;
        let mut controller = ReorderController::new(listed.data().unwrap().items.clone());
        controller.start_reorder();
        controller
            .move_item(0, 1, &banners.reorder_persister(), notifier.as_ref())
            .await
            .unwrap();

        assert_eq!(names(controller.displayed()), vec!["B", "A", "C"]);
        let patches = backend
            .requests()
            .iter()
            .filter(|r| r.method == HttpMethod::Patch)
            .count();
        assert_eq!(patches, 2);

        let reread = banners.list(&BannerListParams::default()).await;
        assert!(!reread.from_cache);
        assert_eq!(names(&reread.data().unwrap().items), vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn failed_sort_order_reverts_and_toasts_once() {
        let (backend, _) = banner_backend(true);
        let (admin, notifier) = admin_client(backend).await;
        let banners = admin.banners();

        let listed = banners.list(&BannerListParams::default()).await;
        let mut controller = ReorderController::new(listed.data().unwrap().items.clone());
        controller.start_reorder();
        let result = controller
            .move_item(0, 1, &banners.reorder_persister(), notifier.as_ref())
            .await;

        assert!(result.is_err());
        assert_eq!(names(controller.displayed()), vec!["A", "B", "C"]);
        let toasts = notifier.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
    }

    #[tokio::test]
    async fn missing_banner_detail_is_an_error() {
        let (backend, _) = banner_backend(false);
        let (admin, _) = admin_client(backend).await;

        let result = admin.banners().detail(Some(9999)).await;
        assert!(result.is_error());
        assert_eq!(result.error.unwrap().kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn status_toggle_invalidates_list_and_detail() {
        let (backend, _) = banner_backend(false);
        let (admin, _) = admin_client(backend.clone()).await;
        let banners = admin.banners();

        banners.list(&BannerListParams::default()).await;
        banners.detail(Some(1)).await;
        banners
            .update_status(MutationOptions::new())
            .mutate_async(BannerStatusChange {
                id: 1,
                is_active: false,
            })
            .await
            .unwrap();

        assert_eq!(backend.last().unwrap().body, Some(json!({ "isActive": false })));
        banners.list(&BannerListParams::default()).await;
        banners.detail(Some(1)).await;
        assert_eq!(backend.count("GET", "/banners"), 2);
        assert_eq!(backend.count("GET", "/banners/1"), 2);
    }
}
