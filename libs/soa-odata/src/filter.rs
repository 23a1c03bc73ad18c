//! Prefix-encoded filter parameters to `OData` `$filter` expressions.
//!
//! A parameter name carries both the target field and the operator:
//!
//! | Prefix | Clause |
//! |---|---|
//! | `sw_` / `swl_` / `swu_` | `startswith(field,'v')`, optionally case-folded |
//! | `c_` / `cl_` / `cu_` | `contains(field,'v')`, optionally case-folded |
//! | `ew_` / `ewl_` / `ewu_` | `endswith(field,'v')`, optionally case-folded |
//! | `eql_` / `equ_` | `tolower(field) eq tolower('v')` / `toupper(..)` |
//! | `cq_` | value passed through verbatim |
//! | `search_f1_f2..` | `contains(tolower(f1),tolower('v')) or contains(tolower(f2),..)` |
//! | none | `field eq 'v'` |
//!
//! Values are percent-decoded and single-quoted without any type coercion.

use crate::intent::QueryIntent;
use crate::url::decode_component;

/// Case transform applied to both sides of a comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaseFold {
    Exact,
    Lower,
    Upper,
}

impl CaseFold {
    fn apply(self, operand: &str) -> String {
        match self {
            CaseFold::Exact => operand.to_owned(),
            CaseFold::Lower => format!("tolower({operand})"),
            CaseFold::Upper => format!("toupper({operand})"),
        }
    }
}

/// Operator encoded by a parameter-name prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterOp {
    StartsWith(CaseFold),
    Contains(CaseFold),
    EndsWith(CaseFold),
    Eq(CaseFold),
    /// Caller-trusted expression, emitted unquoted and unescaped.
    Custom,
    /// Case-insensitive `contains` over several `_`-separated fields.
    Search,
}

const PREFIXES: &[(&str, FilterOp)] = &[
    ("sw_", FilterOp::StartsWith(CaseFold::Exact)),
    ("swl_", FilterOp::StartsWith(CaseFold::Lower)),
    ("swu_", FilterOp::StartsWith(CaseFold::Upper)),
    ("c_", FilterOp::Contains(CaseFold::Exact)),
    ("cl_", FilterOp::Contains(CaseFold::Lower)),
    ("cu_", FilterOp::Contains(CaseFold::Upper)),
    ("ew_", FilterOp::EndsWith(CaseFold::Exact)),
    ("ewl_", FilterOp::EndsWith(CaseFold::Lower)),
    ("ewu_", FilterOp::EndsWith(CaseFold::Upper)),
    ("eql_", FilterOp::Eq(CaseFold::Lower)),
    ("equ_", FilterOp::Eq(CaseFold::Upper)),
    ("cq_", FilterOp::Custom),
    ("search_", FilterOp::Search),
];

impl FilterOp {
    /// Split a parameter name into its operator and target field.
    ///
    /// Prefixes match exactly at the start of the name; a name with no known
    /// prefix is a plain equality on the whole name.
    #[must_use]
    pub fn parse(key: &str) -> (FilterOp, &str) {
        PREFIXES
            .iter()
            .find_map(|(prefix, op)| key.strip_prefix(prefix).map(|field| (*op, field)))
            .unwrap_or((FilterOp::Eq(CaseFold::Exact), key))
    }

    fn render(self, field: &str, value: &str) -> Clause {
        let quoted = format!("'{value}'");
        let text = match self {
            FilterOp::StartsWith(fold) => function("startswith", fold, field, &quoted),
            FilterOp::Contains(fold) => function("contains", fold, field, &quoted),
            FilterOp::EndsWith(fold) => function("endswith", fold, field, &quoted),
            FilterOp::Eq(fold) => format!("{} eq {}", fold.apply(field), fold.apply(&quoted)),
            FilterOp::Custom => value.to_owned(),
            FilterOp::Search => {
                let terms: Vec<String> = field
                    .split('_')
                    .map(|f| function("contains", CaseFold::Lower, f, &quoted))
                    .collect();
                return Clause {
                    disjunction: terms.len() > 1,
                    text: terms.join(" or "),
                };
            }
        };
        Clause {
            text,
            disjunction: false,
        }
    }
}

fn function(name: &str, fold: CaseFold, field: &str, quoted: &str) -> String {
    format!("{name}({},{})", fold.apply(field), fold.apply(quoted))
}

struct Clause {
    text: String,
    disjunction: bool,
}

/// Renders a [`QueryIntent`] into one `$filter` expression.
///
/// Clauses are joined with `" and "` in intent order. Unprefixed parameters
/// whose name starts with `$` or equals the pagination marker are skipped.
#[derive(Clone, Debug)]
pub struct FilterTranslator {
    page_marker: String,
}

impl Default for FilterTranslator {
    fn default() -> Self {
        Self::new("page")
    }
}

impl FilterTranslator {
    /// Create a translator that skips `page_marker` (case-insensitive).
    #[must_use]
    pub fn new(page_marker: impl Into<String>) -> Self {
        Self {
            page_marker: page_marker.into(),
        }
    }

    #[must_use]
    pub fn page_marker(&self) -> &str {
        &self.page_marker
    }

    /// Translate the intent; an empty intent yields an empty string.
    #[must_use]
    pub fn translate(&self, intent: &QueryIntent) -> String {
        self.translate_pairs(intent.iter())
    }

    /// Translate arbitrary ordered `(name, value)` pairs.
    #[must_use]
    pub fn translate_pairs<'a, I>(&self, pairs: I) -> String
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let clauses: Vec<Clause> = pairs
            .into_iter()
            .filter_map(|(key, raw)| {
                let (op, field) = FilterOp::parse(key);
                if op == FilterOp::Eq(CaseFold::Exact) && self.is_reserved(key) {
                    return None;
                }
                Some(op.render(field, &decode_component(raw)))
            })
            .collect();

        let joined = clauses.len() > 1;
        let parts: Vec<String> = clauses
            .into_iter()
            .map(|clause| {
                if joined && clause.disjunction {
                    format!("({})", clause.text)
                } else {
                    clause.text
                }
            })
            .collect();

        let expr = parts.join(" and ");
        tracing::trace!(filter = %expr, "translated filter intent");
        expr
    }

    fn is_reserved(&self, key: &str) -> bool {
        key.starts_with('$') || key.eq_ignore_ascii_case(&self.page_marker)
    }
}
