use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use ts_rs::TS;

/// Processing state of a user inquiry
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, EnumString, Display, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HelpStatus {
    #[default]
    Waiting,
    Success,
    Reject,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct HelpSummary {
    pub id: i64,
    pub title: String,
    pub status: HelpStatus,
    pub user_nickname: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct HelpDetail {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub status: HelpStatus,
    pub user_nickname: Option<String>,
    pub response_content: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub answered_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct HelpListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<HelpStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct HelpAnswerRequest {
    pub response_content: String,
    pub status: HelpStatus,
}
