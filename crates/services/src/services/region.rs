use models::models::region::{RegionListParams, RegionSummary};

use super::{query_key::Entity, resource::{ListResource, ResourceHooks}};

/// Reference data, read only.
pub struct Regions;

impl ListResource for Regions {
    const ENTITY: Entity = Entity::Region;
    const PATH: &'static str = "/regions";

    type Summary = RegionSummary;
    type ListParams = RegionListParams;
}

pub type RegionHooks = ResourceHooks<Regions>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::services::test_support::{MockBackend, admin_client, ok, page};

    #[tokio::test]
    async fn lists_regions() {
        let backend = MockBackend::new(|_| {
            ok(page(json!([
                { "id": 1, "korName": "아일라", "engName": "Islay", "continent": "Europe" },
                { "id": 2, "korName": "스페이사이드", "engName": "Speyside", "continent": null }
            ])))
        });
        let (admin, _) = admin_client(backend).await;

        let result = admin.regions().list(&RegionListParams::default()).await;
        let regions = &result.data().unwrap().items;
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].eng_name, "Islay");
        assert_eq!(regions[1].continent, None);
    }
}
