use models::models::{
    page::IdResponse,
    tasting_tag::{
        TastingTagAlcoholsRequest, TastingTagDetail, TastingTagListParams, TastingTagRequest,
        TastingTagSummary,
    },
};

use super::{
    api_error::ApiError,
    membership::MembershipChange,
    mutation::{Mutation, MutationOptions},
    query_key::Entity,
    resource::{ListResource, Resource, ResourceHooks, ResourceService, item_path},
};

pub struct TastingTags;

impl ListResource for TastingTags {
    const ENTITY: Entity = Entity::TastingTag;
    const PATH: &'static str = "/tasting-tags";

    type Summary = TastingTagSummary;
    type ListParams = TastingTagListParams;
}

impl Resource for TastingTags {
    type Detail = TastingTagDetail;
    type Form = TastingTagRequest;

    fn form_defaults(detail: &TastingTagDetail) -> TastingTagRequest {
        TastingTagRequest::from(detail)
    }
}

pub type TastingTagHooks = ResourceHooks<TastingTags>;

impl ResourceService<TastingTags> {
    fn alcohols_path(tag_id: i64) -> String {
        format!("{}/alcohols", item_path(TastingTags::PATH, tag_id))
    }

    pub async fn connect_alcohols(&self, change: MembershipChange) -> Result<IdResponse, ApiError> {
        self.client()
            .post(&Self::alcohols_path(change.owner_id), &TastingTagAlcoholsRequest {
                alcohol_ids: change.alcohol_ids,
            })
            .await
    }

    /// Bulk removal; the ids travel in the DELETE body.
    pub async fn disconnect_alcohols(&self, change: MembershipChange) -> Result<IdResponse, ApiError> {
        self.client()
            .delete_with_body(&Self::alcohols_path(change.owner_id), &TastingTagAlcoholsRequest {
                alcohol_ids: change.alcohol_ids,
            })
            .await
    }
}

impl ResourceHooks<TastingTags> {
    pub fn connect_alcohols(
        &self,
        options: MutationOptions<MembershipChange, IdResponse>,
    ) -> Mutation<MembershipChange, IdResponse> {
        self.relationship(MembershipChange::owner, options, |service, change| async move {
            service.connect_alcohols(change).await
        })
    }

    pub fn disconnect_alcohols(
        &self,
        options: MutationOptions<MembershipChange, IdResponse>,
    ) -> Mutation<MembershipChange, IdResponse> {
        self.relationship(MembershipChange::owner, options, |service, change| async move {
            service.disconnect_alcohols(change).await
        })
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
        test_support::{MockBackend, admin_client, fail, ok, page, query_param, relative_path},
        transport::HttpMethod,
    };

    fn tag(id: i64, kor_name: &str, eng_name: &str) -> Value {
        json!({ "id": id, "korName": kor_name, "engName": eng_name, "icon": null, "alcoholCount": 0 })
    }

    /// Two tags; list honours `keyword`, create rejects existing names.
    fn tag_backend() -> MockBackend {
        let tags = Arc::new(Mutex::new(vec![tag(1, "바닐라", "Vanilla"), tag(2, "스모키", "Smoky")]));
        MockBackend::new(move |req| {
            let path = relative_path(req).to_string();
            let mut tags = tags.lock().unwrap();
            match (req.method, path.as_str()) {
                (HttpMethod::Get, "/tasting-tags") => {
                    let keyword = query_param(req, "keyword");
                    let items: Vec<Value> = tags
                        .iter()
                        .filter(|t| {
                            keyword
                                .as_deref()
                                .is_none_or(|k| t["korName"].as_str().is_some_and(|n| n.contains(k)))
                        })
                        .cloned()
                        .collect();
                    ok(page(Value::Array(items)))
                }
                (HttpMethod::Post, "/tasting-tags") => {
                    let body = req.body.clone().unwrap_or_default();
                    if tags.iter().any(|t| t["korName"] == body["korName"]) {
                        return fail(400, "DUPLICATE_NAME", "이미 존재하는 태그명입니다.");
                    }
                    let id = tags.len() as i64 + 1;
                    tags.push(tag(id, body["korName"].as_str().unwrap_or_default(), ""));
                    ok(json!({ "targetId": id }))
                }
                (HttpMethod::Post | HttpMethod::Delete, "/tasting-tags/1/alcohols") => {
                    ok(json!({ "targetId": 1 }))
                }
                (HttpMethod::Get, "/tasting-tags/1") => ok(json!({
                    "id": 1, "korName": "바닐라", "engName": "Vanilla", "icon": null,
                    "description": null, "alcohols": []
                })),
                _ => fail(404, "TASTING_TAG_NOT_FOUND", "태그를 찾을 수 없습니다."),
            }
        })
    }

    #[tokio::test]
    async fn keyword_filters_the_list() {
        let (admin, _) = admin_client(tag_backend()).await;
        let result = admin
            .tasting_tags()
            .list(&TastingTagListParams {
                keyword: Some("바닐라".into()),
                ..Default::default()
            })
            .await;

        let items = &result.data().unwrap().items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].kor_name, "바닐라");
    }

    #[tokio::test]
    async fn duplicate_name_surfaces_the_server_message() {
        let backend = tag_backend();
        let (admin, notifier) = admin_client(backend.clone()).await;
        let create = admin.tasting_tags().create(MutationOptions::new());

        let err = create
            .mutate_async(TastingTagRequest {
                kor_name: "바닐라".into(),
                eng_name: "Vanilla".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.code, "DUPLICATE_NAME");
        assert!(create.is_error());
        let toasts = notifier.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[0].message, "이미 존재하는 태그명입니다.");
    }

    #[tokio::test]
    async fn create_refreshes_the_list() {
        let backend = tag_backend();
        let (admin, _) = admin_client(backend.clone()).await;
        let tags = admin.tasting_tags();
        let params = TastingTagListParams::default();

        assert_eq!(tags.list(&params).await.data().unwrap().items.len(), 2);
        tags.create(MutationOptions::new().success_message("태그가 등록되었습니다."))
            .mutate_async(TastingTagRequest {
                kor_name: "피트".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let after = tags.list(&params).await;
        assert!(!after.from_cache);
        assert_eq!(after.data().unwrap().items.len(), 3);
        assert_eq!(backend.count("GET", "/tasting-tags"), 2);
    }

    #[tokio::test]
    async fn disconnect_sends_ids_in_the_delete_body() {
        let backend = tag_backend();
        let (admin, _) = admin_client(backend.clone()).await;
        let tags = admin.tasting_tags();
        tags.detail(Some(1)).await;

        tags.disconnect_alcohols(MutationOptions::new())
            .mutate_async(MembershipChange {
                owner_id: 1,
                alcohol_ids: vec![10, 11],
            })
            .await
            .unwrap();

        let last = backend.last().unwrap();
        assert_eq!(last.method, HttpMethod::Delete);
        assert_eq!(last.body, Some(json!({ "alcoholIds": [10, 11] })));
        assert!(!tags.detail(Some(1)).await.from_cache);
    }
}
