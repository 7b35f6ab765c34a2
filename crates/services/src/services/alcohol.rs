use models::models::alcohol::{AlcoholDetail, AlcoholRequest, AlcoholSearchParams, AlcoholSummary};

use super::{
    query_key::Entity,
    resource::{ListResource, Resource, ResourceHooks},
};

/// Whisky records. The list endpoint doubles as search for the member pickers
/// of curations and tasting tags.
pub struct Alcohols;

impl ListResource for Alcohols {
    const ENTITY: Entity = Entity::Alcohol;
    const PATH: &'static str = "/alcohols";

    type Summary = AlcoholSummary;
    type ListParams = AlcoholSearchParams;
}

impl Resource for Alcohols {
    type Detail = AlcoholDetail;
    type Form = AlcoholRequest;

    fn form_defaults(detail: &AlcoholDetail) -> AlcoholRequest {
        AlcoholRequest::from(detail)
    }
}

pub type AlcoholHooks = ResourceHooks<Alcohols>;
