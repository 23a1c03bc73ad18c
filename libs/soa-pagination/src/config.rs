use serde::{Deserialize, Serialize};

/// Settings of a [`crate::PaginationEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Envelope field holding the total record count
    #[serde(default = "default_count_field")]
    pub count_field: String,

    /// Envelope field holding the current page's records
    #[serde(default = "default_data_field")]
    pub data_field: String,

    /// Maximum number of entries in the page-link window
    #[serde(default = "default_spread")]
    pub spread: u32,

    /// Build page links as `?page=n` instead of `/n` path segments
    #[serde(default)]
    pub page_query_string: bool,
}

fn default_count_field() -> String {
    "count".to_owned()
}

fn default_data_field() -> String {
    "data".to_owned()
}

fn default_spread() -> u32 {
    10
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            count_field: default_count_field(),
            data_field: default_data_field(),
            spread: default_spread(),
            page_query_string: false,
        }
    }
}
