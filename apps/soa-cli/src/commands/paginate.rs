use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;
use soa_odata::Paginate;
use soa_pagination::{PaginatedResult, PaginationConfig, PaginationEngine, ResultEnvelope};

use super::print_json;

#[derive(Args, Debug)]
pub struct PaginateArgs {
    /// Requested page as it appears in a URL
    #[arg(long, default_value = "1")]
    page: String,

    #[arg(long, default_value_t = 10)]
    page_size: u64,

    /// Total number of records
    #[arg(long, default_value_t = 0, conflicts_with = "envelope")]
    count: i64,

    /// Full response body (`{"count": .., "data": ..}` or an array of records)
    #[arg(long)]
    envelope: Option<String>,

    /// URL the page links are built from
    #[arg(long, default_value = "")]
    base_url: String,

    /// Full URL of the current request, query string included
    #[arg(long)]
    raw_url: Option<String>,

    /// Build links as `?page=n` whatever the configuration says
    #[arg(long)]
    query_string: bool,
}

impl PaginateArgs {
    pub fn run(&self, config: &PaginationConfig) -> Result<()> {
        print_json(&self.paginate(config)?)
    }

    fn paginate(&self, config: &PaginationConfig) -> Result<PaginatedResult> {
        let mut config = config.clone();
        config.page_query_string |= self.query_string;

        let envelope = match &self.envelope {
            Some(raw) => {
                let body: Value =
                    serde_json::from_str(raw).context("envelope is not valid JSON")?;
                ResultEnvelope::from_json(body, &config)
            }
            None => ResultEnvelope::Counted {
                count: self.count,
                data: Value::Array(Vec::new()),
            },
        };

        let mut params =
            Paginate::from_raw_page(&self.page, self.page_size).with_base_url(self.base_url.as_str());
        if let Some(raw_url) = &self.raw_url {
            params = params.with_raw_url(raw_url.as_str());
        }

        Ok(PaginationEngine::new(config).get(&params, envelope))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: PaginateArgs,
    }

    fn paginate(argv: &[&str]) -> PaginatedResult {
        let harness = Harness::try_parse_from(std::iter::once("soa").chain(argv.iter().copied()))
            .unwrap();
        harness.args.paginate(&PaginationConfig::default()).unwrap()
    }

    #[test]
    fn test_counted_path_links() {
        let result = paginate(&["--page", "2", "--count", "25", "--base-url", "/users"]);
        assert_eq!(result.pagination.page_count, 3);
        assert_eq!(result.pagination.prev_page, "/users/1");
        assert_eq!(result.pagination.next_page, "/users/3");
        assert_eq!(result.data, json!([]));
    }

    #[test]
    fn test_envelope_and_query_string_links() {
        let result = paginate(&[
            "--page",
            "1abc",
            "--page-size",
            "2",
            "--envelope",
            r#"{"count": 5, "data": [{"id": 1}, {"id": 2}]}"#,
            "--base-url",
            "/users",
            "--query-string",
        ]);
        assert_eq!(result.pagination.page, 1);
        assert_eq!(result.pagination.page_count, 3);
        assert_eq!(result.pagination.next_page, "/users?page=2");
        assert_eq!(result.data, json!([{"id": 1}, {"id": 2}]));
    }

    #[test]
    fn test_count_conflicts_with_envelope() {
        let parsed = Harness::try_parse_from(["soa", "--count", "3", "--envelope", "[]"]);
        assert!(parsed.is_err());
    }
}
