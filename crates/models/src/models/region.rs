use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct RegionSummary {
    pub id: i64,
    pub kor_name: String,
    pub eng_name: String,
    pub continent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct RegionListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}
