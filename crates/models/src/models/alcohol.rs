use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

use super::tasting_tag::TastingTagSummary;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AlcoholCategory {
    SingleMalt,
    Blend,
    BlendedMalt,
    Bourbon,
    Rye,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AlcoholSummary {
    pub id: i64,
    pub kor_name: String,
    pub eng_name: String,
    #[serde(default)]
    pub category: AlcoholCategory,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AlcoholDetail {
    pub id: i64,
    pub kor_name: String,
    pub eng_name: String,
    #[serde(default)]
    pub category: AlcoholCategory,
    pub region_id: Option<i64>,
    pub distillery_id: Option<i64>,
    pub image_url: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tasting_tags: Vec<TastingTagSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AlcoholRequest {
    pub kor_name: String,
    pub eng_name: String,
    pub category: AlcoholCategory,
    pub region_id: Option<i64>,
    pub distillery_id: Option<i64>,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl From<&AlcoholDetail> for AlcoholRequest {
    fn from(detail: &AlcoholDetail) -> Self {
        Self {
            kor_name: detail.kor_name.clone(),
            eng_name: detail.eng_name.clone(),
            category: detail.category,
            region_id: detail.region_id,
            distillery_id: detail.distillery_id,
            image_url: detail.image_url.clone(),
            description: detail.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct AlcoholSearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<AlcoholCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}
