use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

/// Where a banner sends the user when tapped
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BannerType {
    Survey,
    Curation,
    #[default]
    Ad,
    Partnership,
    Etc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct BannerSummary {
    pub id: i64,
    pub name: String,
    pub banner_type: BannerType,
    pub sort_order: i32,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct BannerDetail {
    pub id: i64,
    pub name: String,
    pub banner_type: BannerType,
    pub sort_order: i32,
    pub is_active: bool,
    pub image_url: Option<String>,
    pub target_url: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

/// Create and update share one body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct BannerRequest {
    pub name: String,
    pub banner_type: BannerType,
    pub image_url: Option<String>,
    pub target_url: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl From<&BannerDetail> for BannerRequest {
    fn from(detail: &BannerDetail) -> Self {
        Self {
            name: detail.name.clone(),
            banner_type: detail.banner_type,
            image_url: detail.image_url.clone(),
            target_url: detail.target_url.clone(),
            description: detail.description.clone(),
            is_active: detail.is_active,
            start_date: detail.start_date,
            end_date: detail.end_date,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct BannerListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct BannerStatusRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct SortOrderRequest {
    pub sort_order: i32,
}
