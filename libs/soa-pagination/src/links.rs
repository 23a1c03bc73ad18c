//! Page link construction.
//!
//! Query-string links rewrite an existing `page=` pair by literal substring
//! replacement on the raw URL's query suffix, so all other parameters keep
//! their exact original text.

use soa_odata::url::{encode_component, query_suffix, query_value};

const PAGE_KEY: &str = "page";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// `base/n` followed by the raw URL's query suffix
    Path,
    /// `base` followed by the raw URL's query suffix with `page=n` set
    QueryString,
}

/// Builds the URL of every page of one paginated listing.
#[derive(Debug, Clone)]
pub struct PageLinker<'a> {
    style: LinkStyle,
    base_url: &'a str,
    raw_url: Option<&'a str>,
    query_search: Option<&'a str>,
}

impl<'a> PageLinker<'a> {
    #[must_use]
    pub fn new(style: LinkStyle, base_url: &'a str, raw_url: Option<&'a str>) -> Self {
        Self {
            style,
            base_url,
            raw_url,
            query_search: raw_url.and_then(query_suffix),
        }
    }

    #[must_use]
    pub fn url(&self, page: i64) -> String {
        match self.style {
            LinkStyle::Path => {
                let search = self.query_search.unwrap_or_default();
                format!("{}/{page}{search}", self.base_url)
            }
            LinkStyle::QueryString => format!("{}{}", self.base_url, self.with_page(page)),
        }
    }

    fn with_page(&self, page: i64) -> String {
        let page = page.to_string();
        match self.query_search.filter(|s| !s.is_empty()) {
            None => format!("?{PAGE_KEY}={}", encode_component(&page)),
            Some(search) => {
                let current = self
                    .raw_url
                    .and_then(|raw| query_value(raw, PAGE_KEY))
                    .filter(|v| !v.is_empty());
                match current {
                    None => format!("{search}&{PAGE_KEY}={}", encode_component(&page)),
                    Some(current) => search.replacen(
                        &format!("{PAGE_KEY}={current}"),
                        &format!("{PAGE_KEY}={page}"),
                        1,
                    ),
                }
            }
        }
    }
}
