use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::alcohol::AlcoholSummary;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TastingTagSummary {
    pub id: i64,
    pub kor_name: String,
    pub eng_name: String,
    pub icon: Option<String>,
    #[serde(default)]
    pub alcohol_count: u32,
}

/// Detail view; connected alcohols are only visible here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TastingTagDetail {
    pub id: i64,
    pub kor_name: String,
    pub eng_name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub alcohols: Vec<AlcoholSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TastingTagRequest {
    pub kor_name: String,
    pub eng_name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl From<&TastingTagDetail> for TastingTagRequest {
    fn from(detail: &TastingTagDetail) -> Self {
        Self {
            kor_name: detail.kor_name.clone(),
            eng_name: detail.eng_name.clone(),
            icon: detail.icon.clone(),
            description: detail.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TastingTagListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct TastingTagAlcoholsRequest {
    pub alcohol_ids: Vec<i64>,
}
