use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Offset pagination metadata returned by every list endpoint except helps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Page<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct CursorMeta {
    pub cursor: Option<i64>,
    pub has_next: bool,
}

/// Cursor pagination, used by the help inbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub meta: CursorMeta,
}

/// Body returned by create, update and delete endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct IdResponse {
    pub target_id: i64,
}
