use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::alcohol::AlcoholSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CurationSummary {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    #[serde(default)]
    pub alcohol_count: u32,
}

/// Detail view; member alcohols are only visible here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CurationDetail {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    #[serde(default)]
    pub alcohols: Vec<AlcoholSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CurationRequest {
    pub name: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_active: bool,
    #[serde(default)]
    pub alcohol_ids: Vec<i64>,
}

impl From<&CurationDetail> for CurationRequest {
    fn from(detail: &CurationDetail) -> Self {
        Self {
            name: detail.name.clone(),
            description: detail.description.clone(),
            cover_image_url: detail.cover_image_url.clone(),
            is_active: detail.is_active,
            alcohol_ids: detail.alcohols.iter().map(|a| a.id).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CurationListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOrderRequest {
    pub display_order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CurationAlcoholsRequest {
    pub alcohol_ids: Vec<i64>,
}
