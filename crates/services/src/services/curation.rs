use models::models::{
    curation::{
        CurationAlcoholsRequest, CurationDetail, CurationListParams, CurationRequest,
        CurationSummary, DisplayOrderRequest,
    },
    page::IdResponse,
};

use super::{
    api_error::ApiError,
    membership::MembershipChange,
    mutation::{Mutation, MutationOptions},
    query_key::{Entity, QueryKey},
    reorder::{MutationPersister, OrderChange, Reorderable},
    resource::{ListResource, Resource, ResourceHooks, ResourceService, item_path},
};

pub struct Curations;

impl ListResource for Curations {
    const ENTITY: Entity = Entity::Curation;
    const PATH: &'static str = "/curations";

    type Summary = CurationSummary;
    type ListParams = CurationListParams;
}

impl Resource for Curations {
    type Detail = CurationDetail;
    type Form = CurationRequest;

    fn form_defaults(detail: &CurationDetail) -> CurationRequest {
        CurationRequest::from(detail)
    }
}

pub type CurationHooks = ResourceHooks<Curations>;

impl Reorderable for CurationSummary {
    fn id(&self) -> i64 {
        self.id
    }

    fn order(&self) -> i32 {
        self.display_order
    }

    fn set_order(&mut self, order: i32) {
        self.display_order = order;
    }
}

impl ResourceService<Curations> {
    pub async fn update_display_order(&self, change: OrderChange) -> Result<IdResponse, ApiError> {
        let path = format!("{}/display-order", item_path(Curations::PATH, change.id));
        self.client()
            .patch(&path, &DisplayOrderRequest {
                display_order: change.order,
            })
            .await
    }

    /// `POST /curations/{id}/alcohols`.
    pub async fn add_alcohols(&self, change: MembershipChange) -> Result<IdResponse, ApiError> {
        let path = format!("{}/alcohols", item_path(Curations::PATH, change.owner_id));
        self.client()
            .post(&path, &CurationAlcoholsRequest {
                alcohol_ids: change.alcohol_ids,
            })
            .await
    }

    /// The backend removes one member per call, so removals are sent in order
    /// and stop at the first failure.
    pub async fn remove_alcohols(&self, change: MembershipChange) -> Result<IdResponse, ApiError> {
        let base = format!("{}/alcohols", item_path(Curations::PATH, change.owner_id));
        let mut last = IdResponse {
            target_id: change.owner_id,
        };
        for alcohol_id in change.alcohol_ids {
            last = self.client().delete(&item_path(&base, alcohol_id)).await?;
        }
        Ok(last)
    }
}

impl ResourceHooks<Curations> {
    pub fn update_display_order(
        &self,
        options: MutationOptions<OrderChange, IdResponse>,
    ) -> Mutation<OrderChange, IdResponse> {
        self.relationship(
            |change: &OrderChange| change.id,
            options,
            |service, change| async move { service.update_display_order(change).await },
        )
    }

    pub fn reorder_persister(&self) -> MutationPersister {
        MutationPersister::new(
            self.update_display_order(MutationOptions::new().suppress_error_toast()),
            self.context().cache.clone(),
            QueryKey::lists(Entity::Curation),
        )
    }

    pub fn add_alcohols(
        &self,
        options: MutationOptions<MembershipChange, IdResponse>,
    ) -> Mutation<MembershipChange, IdResponse> {
        self.relationship(MembershipChange::owner, options, |service, change| async move {
            service.add_alcohols(change).await
        })
    }

    pub fn remove_alcohols(
        &self,
        options: MutationOptions<MembershipChange, IdResponse>,
    ) -> Mutation<MembershipChange, IdResponse> {
        self.relationship(MembershipChange::owner, options, |service, change| async move {
            service.remove_alcohols(change).await
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use models::models::alcohol::AlcoholSummary;
    use serde_json::{Value, json};

    use super::*;
    use crate::services::{
        membership::MembershipEditor,
        notification::ToastKind,
        test_support::{MockBackend, admin_client, fail, ok, page, relative_path},
        transport::HttpMethod,
    };

    fn alcohol(id: i64) -> Value {
        json!({ "id": id, "korName": format!("위스키 {id}"), "engName": format!("Whisky {id}"), "category": "SINGLE_MALT", "imageUrl": null })
    }

    fn curation_backend() -> (MockBackend, Arc<Mutex<Vec<i64>>>) {
        curation_backend_rejecting_delete(None)
    }

    /// Members start as [1, 2]; deleting `rejected` answers 500.
    fn curation_backend_rejecting_delete(rejected: Option<i64>) -> (MockBackend, Arc<Mutex<Vec<i64>>>) {
        let members = Arc::new(Mutex::new(vec![1_i64, 2]));
        let state = members.clone();
        let backend = MockBackend::new(move |req| {
            let path = relative_path(req).to_string();
            let mut members = state.lock().unwrap();
            match (req.method, path.as_str()) {
                (HttpMethod::Get, "/curations") => ok(page(json!([{
                    "id": 5, "name": "여름 추천", "description": null,
                    "displayOrder": 0, "isActive": true, "alcoholCount": members.len()
                }]))),
                (HttpMethod::Get, "/curations/5") => ok(json!({
                    "id": 5, "name": "여름 추천", "description": null, "coverImageUrl": null,
                    "displayOrder": 0, "isActive": true,
                    "alcohols": members.iter().map(|id| alcohol(*id)).collect::<Vec<_>>()
                })),
                (HttpMethod::Post, "/curations/5/alcohols") => {
                    let ids = req.body.as_ref().unwrap()["alcoholIds"].as_array().unwrap().clone();
                    if ids.iter().any(|id| members.contains(&id.as_i64().unwrap())) {
                        return fail(409, "CURATION_ALCOHOL_DUPLICATED", "이미 포함된 위스키입니다.");
                    }
                    members.extend(ids.iter().filter_map(Value::as_i64));
                    ok(json!({ "targetId": 5 }))
                }
                (HttpMethod::Delete, p) if p.starts_with("/curations/5/alcohols/") => {
                    let id: i64 = p.rsplit('/').next().unwrap().parse().unwrap();
                    if rejected == Some(id) {
                        return fail(500, "INTERNAL_SERVER_ERROR", "서버 오류가 발생했습니다.");
                    }
                    members.retain(|m| *m != id);
                    ok(json!({ "targetId": 5 }))
                }
                (HttpMethod::Patch, "/curations/5/display-order") => ok(json!({ "targetId": 5 })),
                _ => fail(404, "CURATION_NOT_FOUND", "큐레이션을 찾을 수 없습니다."),
            }
        });
        (backend, members)
    }

    fn summaries(ids: &[i64]) -> Vec<AlcoholSummary> {
        ids.iter()
            .map(|id| serde_json::from_value(alcohol(*id)).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn adding_members_invalidates_only_the_detail() {
        let (backend, members) = curation_backend();
        let (admin, _) = admin_client(backend.clone()).await;
        let curations = admin.curations();

        curations.list(&CurationListParams::default()).await;
        let detail = curations.detail(Some(5)).await;
        let mut editor = MembershipEditor::new(5, detail.data().unwrap().alcohols.clone());

        let add = curations.add_alcohols(MutationOptions::new());
        editor.add(summaries(&[3]), &add).await.unwrap();
        assert_eq!(*members.lock().unwrap(), vec![1, 2, 3]);

        let list = curations.list(&CurationListParams::default()).await;
        assert!(list.from_cache);
        let detail = curations.detail(Some(5)).await;
        assert!(!detail.from_cache);
        assert_eq!(detail.data().unwrap().alcohols.len(), 3);
    }

    #[tokio::test]
    async fn removals_are_sent_one_per_alcohol() {
        let (backend, members) = curation_backend();
        let (admin, _) = admin_client(backend.clone()).await;
        let remove = admin.curations().remove_alcohols(MutationOptions::new());

        let mut editor = MembershipEditor::new(5, summaries(&[1, 2]));
        editor.remove(vec![1, 2], &remove).await.unwrap();

        assert!(members.lock().unwrap().is_empty());
        assert_eq!(backend.count("DELETE", "/curations/5/alcohols/1"), 1);
        assert_eq!(backend.count("DELETE", "/curations/5/alcohols/2"), 1);
        assert!(editor.confirmed().is_empty());
    }

    #[tokio::test]
    async fn partial_removal_failure_refreshes_the_detail() {
        let (backend, members) = curation_backend_rejecting_delete(Some(2));
        let (admin, _) = admin_client(backend.clone()).await;
        let curations = admin.curations();

        let detail = curations.detail(Some(5)).await;
        let mut editor = MembershipEditor::new(5, detail.data().unwrap().alcohols.clone());
        let remove = curations.remove_alcohols(MutationOptions::new());
        let err = editor.remove(vec![1, 2], &remove).await.unwrap_err();

        assert_eq!(err.http_status, Some(500));
        assert_eq!(*members.lock().unwrap(), vec![2]);
        let refreshed = curations.detail(Some(5)).await;
        assert!(!refreshed.from_cache);
        let ids: Vec<i64> = refreshed.data().unwrap().alcohols.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn duplicate_add_rolls_back_with_server_message() {
        let (backend, _) = curation_backend();
        let (admin, notifier) = admin_client(backend).await;
        let add = admin.curations().add_alcohols(MutationOptions::new());

        // Editor opened before alcohol 2 was added elsewhere.
        let mut editor = MembershipEditor::new(5, summaries(&[1]));
        let err = editor.add(summaries(&[2]), &add).await.unwrap_err();

        assert_eq!(err.code, "CURATION_ALCOHOL_DUPLICATED");
        let toasts = notifier.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[0].message, "이미 포함된 위스키입니다.");
        assert_eq!(editor.displayed().len(), 1);
        assert!(!editor.is_pending());
    }

    #[tokio::test]
    async fn display_order_uses_its_own_endpoint() {
        let (backend, _) = curation_backend();
        let (admin, _) = admin_client(backend.clone()).await;

        admin
            .curations()
            .update_display_order(MutationOptions::new())
            .mutate_async(OrderChange { id: 5, order: 3 })
            .await
            .unwrap();

        let last = backend.last().unwrap();
        assert_eq!(relative_path(&last), "/curations/5/display-order");
        assert_eq!(last.body, Some(json!({ "displayOrder": 3 })));
    }
}
