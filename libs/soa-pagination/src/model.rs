use serde::{Deserialize, Serialize};

/// CSS-style marker on the page link of the current page.
pub const ACTIVE_PAGE: &str = "active";
/// Visibility class of a prev/next control that has nowhere to go.
pub const HIDE_CLASS: &str = "hide";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLink {
    pub page: i64,
    pub page_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_page: Option<String>,
}

impl PageLink {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active_page.is_some()
    }
}

/// Navigable view of one page of a result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationModel {
    pub page: i64,
    /// Always at least 1, even for an empty result
    pub page_count: i64,
    pub prev_page: String,
    pub prev_class: String,
    pub prev_page_no: Option<i64>,
    pub next_page: String,
    pub next_class: String,
    pub next_page_no: Option<i64>,
    pub first_page: String,
    pub last_page: String,
    pub pages: Vec<PageLink>,
    /// 1-based index of the first record on this page, 0 for an empty result
    pub begin_record: i64,
    pub end_record: i64,
    pub count: i64,
}

/// Pagination model together with the records of the current page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult {
    pub pagination: PaginationModel,
    pub data: serde_json::Value,
}
