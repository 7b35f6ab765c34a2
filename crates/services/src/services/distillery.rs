use models::models::distillery::{DistilleryListParams, DistillerySummary};

use super::{query_key::Entity, resource::{ListResource, ResourceHooks}};

/// Reference data, read only.
pub struct Distilleries;

impl ListResource for Distilleries {
    const ENTITY: Entity = Entity::Distillery;
    const PATH: &'static str = "/distilleries";

    type Summary = DistillerySummary;
    type ListParams = DistilleryListParams;
}

pub type DistilleryHooks = ResourceHooks<Distilleries>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::services::test_support::{MockBackend, admin_client, ok, page, query_param};

    #[tokio::test]
    async fn filters_by_region() {
        let backend = MockBackend::new(|_| {
            ok(page(json!([
                { "id": 7, "korName": "라프로익", "engName": "Laphroaig", "regionId": 1 }
            ])))
        });
        let (admin, _) = admin_client(backend.clone()).await;

        let result = admin
            .distilleries()
            .list(&DistilleryListParams {
                region_id: Some(1),
                ..Default::default()
            })
            .await;

        assert_eq!(result.data().unwrap().items[0].region_id, Some(1));
        assert_eq!(query_param(&backend.last().unwrap(), "regionId").as_deref(), Some("1"));
    }
}
