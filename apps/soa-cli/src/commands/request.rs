use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::Value;
use soa_odata::{Filter, Paginate, QueryIntent, QueryOptions};
use soa_rest::{HttpTransport, RequestBuilder, RequestDescriptor, RequestParams, RestConfig};

use super::print_json;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    #[arg(value_enum)]
    method: Method,

    /// Resource appended to the configured base path
    resource: Option<String>,

    /// Parameters as JSON: an object for get/delete, any value for post/put
    #[arg(short, long)]
    params: Option<String>,

    #[command(flatten)]
    query: QueryArgs,

    /// Send the request and print the response instead of the descriptor
    #[arg(long)]
    send: bool,

    /// Deadline in seconds for a sent request
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// JSON object of prefix-encoded filter parameters, or a raw `$filter` expression
    #[arg(long)]
    filter: Option<String>,

    #[arg(long)]
    order_by: Option<String>,

    #[arg(long)]
    order_by_desc: Option<String>,

    #[arg(long)]
    top: Option<u64>,

    #[arg(long)]
    skip: Option<u64>,

    /// Page number as it appears in a URL
    #[arg(long)]
    page: Option<String>,

    #[arg(long, default_value_t = 10)]
    page_size: u64,
}

impl QueryArgs {
    fn options(&self) -> Result<QueryOptions> {
        let mut options = QueryOptions::new();
        if let Some(raw) = &self.filter {
            options = options.with_filter(parse_filter(raw)?);
        }
        if let Some(field) = &self.order_by {
            options = options.with_order_by(field.as_str());
        }
        if let Some(field) = &self.order_by_desc {
            options = options.with_order_by_desc(field.as_str());
        }
        if let Some(top) = self.top {
            options = options.with_top(top);
        }
        if let Some(skip) = self.skip {
            options = options.with_skip(skip);
        }
        if let Some(page) = &self.page {
            options = options.with_paginate(Paginate::from_raw_page(page, self.page_size));
        }
        Ok(options)
    }
}

fn parse_filter(raw: &str) -> Result<Filter> {
    if raw.trim_start().starts_with('{') {
        let intent: QueryIntent =
            serde_json::from_str(raw).context("filter is not a valid JSON object")?;
        Ok(Filter::Intent(intent))
    } else {
        Ok(Filter::Expression(raw.to_owned()))
    }
}

fn parse_params(raw: Option<&str>) -> Result<Value> {
    raw.map_or(Ok(Value::Null), |raw| {
        serde_json::from_str(raw).context("params are not valid JSON")
    })
}

fn as_map(params: Value) -> Result<RequestParams> {
    match params {
        Value::Null => Ok(RequestParams::new()),
        Value::Object(map) => Ok(map),
        _ => anyhow::bail!("get and delete take a JSON object of parameters"),
    }
}

impl RequestArgs {
    pub async fn run(&self, config: &RestConfig) -> Result<()> {
        let mut transport = HttpTransport::new();
        if let Some(secs) = self.timeout {
            transport = transport.with_timeout(Duration::from_secs(secs));
        }
        let builder = RequestBuilder::new(config.clone(), transport);

        if !self.send {
            return print_json(&self.describe(&builder)?);
        }

        let resource = self.resource.as_deref();
        let params = parse_params(self.params.as_deref())?;
        let body = match self.method {
            Method::Get => {
                let query = self.query.options()?;
                builder.get(&as_map(params)?, resource, Some(&query)).await
            }
            Method::Post => builder.post(&params, resource).await,
            Method::Put => builder.put(&params, resource).await,
            Method::Delete => builder.delete(&as_map(params)?, resource).await,
        }
        .context("request failed")?;

        tracing::info!(method = ?self.method, "request completed");
        print_json(&body)
    }

    fn describe(&self, builder: &RequestBuilder<HttpTransport>) -> Result<RequestDescriptor> {
        let resource = self.resource.as_deref();
        let params = parse_params(self.params.as_deref())?;
        let descriptor = match self.method {
            Method::Get => {
                let query = self.query.options()?;
                builder.build_get(&as_map(params)?, resource, Some(&query))
            }
            Method::Post => builder.build_post(&params, resource),
            Method::Put => builder.build_put(&params, resource),
            Method::Delete => builder.build_delete(&as_map(params)?, resource),
        };
        Ok(descriptor)
    }
}
