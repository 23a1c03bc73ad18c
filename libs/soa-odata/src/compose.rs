//! Ordered query-string composition.
//!
//! Every fragment inspects the URL built so far to choose its delimiter, so
//! fragments are appended strictly in sequence: filter, orderby, orderby-desc,
//! then either paginate or skip/top.

use serde::{Deserialize, Deserializer, Serialize};

use crate::filter::FilterTranslator;
use crate::intent::QueryIntent;
use crate::url::{delimiter, encode_component};

/// Filter part of a query: a prefixed intent or a ready-made expression.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Filter {
    Expression(String),
    Intent(QueryIntent),
}

impl Filter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Filter::Expression(expr) => expr.is_empty(),
            Filter::Intent(intent) => intent.is_empty(),
        }
    }
}

impl From<QueryIntent> for Filter {
    fn from(intent: QueryIntent) -> Self {
        Filter::Intent(intent)
    }
}

impl From<String> for Filter {
    fn from(expr: String) -> Self {
        Filter::Expression(expr)
    }
}

impl From<&str> for Filter {
    fn from(expr: &str) -> Self {
        Filter::Expression(expr.to_owned())
    }
}

/// Page-based pagination request.
///
/// `base_url` and `raw_url` are only read when building page links.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct Paginate {
    #[serde(default, deserialize_with = "deserialize_page")]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_url: Option<String>,
}

impl Paginate {
    pub fn new(page: i64, page_size: u64) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
            ..Self::default()
        }
    }

    /// Build from a raw page value as it arrives in a URL.
    pub fn from_raw_page(page: &str, page_size: u64) -> Self {
        Self::new(parse_page(page), page_size)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_raw_url(mut self, raw_url: impl Into<String>) -> Self {
        self.raw_url = Some(raw_url.into());
        self
    }
}

/// Parse a page number with integer-prefix semantics.
///
/// Leading whitespace and a sign are accepted, trailing garbage is ignored
/// (`"2abc"` is 2). Input without leading digits is page 1.
#[must_use]
pub fn parse_page(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return 1;
    }
    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    if negative { -magnitude } else { magnitude }
}

fn deserialize_page<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Number(n)) => Some(n.as_i64().unwrap_or_else(|| parse_page(&n.to_string()))),
        Some(serde_json::Value::String(s)) => Some(parse_page(&s)),
        Some(_) => Some(1),
    })
}

/// Query intentions accompanying a GET.
///
/// `paginate` and `skip`/`top` are mutually exclusive: when `paginate` is set,
/// `skip` and `top` are ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[must_use]
pub struct QueryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by_desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paginate: Option<Paginate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<u64>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_order_by(mut self, field: impl Into<String>) -> Self {
        self.order_by = Some(field.into());
        self
    }

    pub fn with_order_by_desc(mut self, field: impl Into<String>) -> Self {
        self.order_by_desc = Some(field.into());
        self
    }

    pub fn with_paginate(mut self, paginate: Paginate) -> Self {
        self.paginate = Some(paginate);
        self
    }

    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_top(mut self, top: u64) -> Self {
        self.top = Some(top);
        self
    }
}

/// Backend query dialect.
///
/// Every method returns the fragment to append to `url` (including its
/// leading delimiter), or an empty string when nothing is to be appended.
pub trait QueryProvider: Send + Sync {
    fn filter(&self, url: &str, filter: &Filter) -> String;

    fn order_by(&self, url: &str, field: &str) -> String;

    /// With an ascending field already supplied, the fragment continues the
    /// existing `$orderby` value (`, field desc`) instead of starting a new one.
    fn order_by_desc(&self, url: &str, asc_field: Option<&str>, desc_field: &str) -> String;

    fn top(&self, url: &str, top: u64) -> String;

    fn skip(&self, url: &str, skip: u64) -> String;

    fn paginate(&self, url: &str, paginate: &Paginate) -> String;
}

/// `OData` v4 query dialect.
#[derive(Clone, Debug, Default)]
pub struct QueryComposer {
    translator: FilterTranslator,
}

impl QueryComposer {
    #[must_use]
    pub fn new(translator: FilterTranslator) -> Self {
        Self { translator }
    }

    #[must_use]
    pub fn translator(&self) -> &FilterTranslator {
        &self.translator
    }
}

fn fragment(url: &str, param: &str) -> String {
    format!("{}{param}", delimiter(url))
}

impl QueryProvider for QueryComposer {
    fn filter(&self, url: &str, filter: &Filter) -> String {
        let expr = match filter {
            Filter::Expression(expr) => expr.clone(),
            Filter::Intent(intent) => self.translator.translate(intent),
        };
        if expr.is_empty() {
            return String::new();
        }
        fragment(url, &format!("$filter={}", encode_component(&expr)))
    }

    fn order_by(&self, url: &str, field: &str) -> String {
        fragment(url, &format!("$orderby={}", encode_component(field)))
    }

    fn order_by_desc(&self, url: &str, asc_field: Option<&str>, desc_field: &str) -> String {
        let encoded = encode_component(&format!("{desc_field} desc")).into_owned();
        if asc_field.is_some() {
            format!(", {encoded}")
        } else {
            fragment(url, &format!("$orderby={encoded}"))
        }
    }

    fn top(&self, url: &str, top: u64) -> String {
        fragment(url, &format!("$top={top}"))
    }

    fn skip(&self, url: &str, skip: u64) -> String {
        fragment(url, &format!("$skip={skip}"))
    }

    fn paginate(&self, url: &str, paginate: &Paginate) -> String {
        let (Some(page), Some(page_size)) = (paginate.page, paginate.page_size) else {
            return String::new();
        };
        let size = i64::try_from(page_size).unwrap_or(i64::MAX);
        let skip = page.saturating_sub(1).saturating_mul(size);
        if skip > 0 {
            fragment(
                url,
                &format!("$skip={skip}&$top={page_size}&$count=true"),
            )
        } else {
            fragment(url, &format!("$top={page_size}&$count=true"))
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

/// Append every fragment `query` asks for to `path`, in protocol order.
pub fn compose(provider: &dyn QueryProvider, path: &mut String, query: &QueryOptions) {
    if let Some(filter) = query.filter.as_ref().filter(|f| !f.is_empty()) {
        let fragment = provider.filter(path, filter);
        path.push_str(&fragment);
    }

    let order_by = non_empty(query.order_by.as_ref());
    if let Some(field) = order_by {
        let fragment = provider.order_by(path, field);
        path.push_str(&fragment);
    }

    if let Some(field) = non_empty(query.order_by_desc.as_ref()) {
        let fragment = provider.order_by_desc(path, order_by, field);
        path.push_str(&fragment);
    }

    if let Some(paginate) = &query.paginate {
        let fragment = provider.paginate(path, paginate);
        path.push_str(&fragment);
    } else {
        if let Some(skip) = query.skip {
            let fragment = provider.skip(path, skip);
            path.push_str(&fragment);
        }
        if let Some(top) = query.top {
            let fragment = provider.top(path, top);
            path.push_str(&fragment);
        }
    }

    tracing::trace!(path = %path, "composed query");
}
