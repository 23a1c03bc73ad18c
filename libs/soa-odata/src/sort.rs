//! Frontend sort links.
//!
//! A sortable listing carries its sort state in its own URL as either
//! `$orderBy=<field>` or `$orderByDesc=<field>`. Changing the sort drops
//! everything from the first `$orderBy` onward and appends the new parameter.

use serde::{Deserialize, Serialize};

use crate::url::{decode_component, delimiter, encode_component, query_value};

const ORDER_BY: &str = "$orderBy";
const ORDER_BY_DESC: &str = "$orderByDesc";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    fn param(self) -> &'static str {
        match self {
            SortDir::Asc => ORDER_BY,
            SortDir::Desc => ORDER_BY_DESC,
        }
    }
}

/// Sort currently encoded in a listing URL.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: String,
    #[serde(rename = "sort")]
    pub dir: SortDir,
}

/// Link to `url` sorted by `field` in direction `dir`.
#[must_use]
pub fn sort_url(url: &str, field: &str, dir: SortDir) -> String {
    let param = format!("{}={}", dir.param(), encode_component(field));
    match url.find(ORDER_BY) {
        Some(index) => format!("{}{param}", &url[..index]),
        None => format!("{url}{}{param}", delimiter(url)),
    }
}

/// Read the sort state back from a listing URL.
///
/// Returns `None` when the URL carries no sort parameter at all. An ascending
/// parameter with a value wins over a descending one.
#[must_use]
pub fn sorted(url: &str) -> Option<SortState> {
    if !url.contains(ORDER_BY) {
        return None;
    }
    if let Some(field) = query_value(url, ORDER_BY).filter(|v| !v.is_empty()) {
        return Some(SortState {
            field: decode_component(field).into_owned(),
            dir: SortDir::Asc,
        });
    }
    let field = query_value(url, ORDER_BY_DESC).unwrap_or_default();
    Some(SortState {
        field: decode_component(field).into_owned(),
        dir: SortDir::Desc,
    })
}
