#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::{Value, json};
use soa_odata::{Paginate, QueryIntent, QueryOptions};
use soa_rest::{
    BoxError, HttpTransport, HttpTransportError, OnSend, RequestBuilder, RequestDescriptor,
    RequestParams, RestConfig, RestError,
};

struct ApiKey;

#[async_trait]
impl OnSend for ApiKey {
    async fn on_send(
        &self,
        descriptor: RequestDescriptor,
        _resource: Option<&str>,
    ) -> Result<RequestDescriptor, BoxError> {
        Ok(descriptor.with_header("X-Api-Key", "secret"))
    }
}

fn builder_for(server: &MockServer) -> RequestBuilder<HttpTransport> {
    let config = RestConfig {
        host: server.host(),
        port: server.port(),
        ..RestConfig::default()
    };
    RequestBuilder::new(config, HttpTransport::new().with_timeout(Duration::from_secs(5)))
}

#[tokio::test]
async fn test_paginated_get_reaches_server() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(Method::GET)
            .path("/api/users")
            .query_param("$filter", "startswith(Name,'A')")
            .query_param("$skip", "10")
            .query_param("$top", "10")
            .query_param("$count", "true");
        then.status(200)
            .json_body(json!({"count": 11, "data": [{"id": 11}]}));
    });

    let query = QueryOptions::new()
        .with_filter(QueryIntent::new().with("sw_Name", "A"))
        .with_paginate(Paginate::new(2, 10));

    let body = builder_for(&server)
        .get(&RequestParams::new(), Some("users"), Some(&query))
        .await
        .unwrap();

    m.assert();
    assert_eq!(body["count"], 11);
}

#[tokio::test]
async fn test_hook_headers_reach_server() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(Method::PUT)
            .path("/api/users")
            .header("x-api-key", "secret")
            .json_body(json!({"id": 3, "name": "Eve"}));
        then.status(200).json_body(json!({"id": 3}));
    });

    let builder = builder_for(&server).with_on_send(Arc::new(ApiKey));
    let body = builder
        .put(&json!({"id": 3, "name": "Eve"}), Some("users"))
        .await
        .unwrap();

    m.assert();
    assert_eq!(body, json!({"id": 3}));
}

#[tokio::test]
async fn test_single_param_delete_hits_segment() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(Method::DELETE).path("/api/users/42");
        then.status(204);
    });

    let mut params = RequestParams::new();
    params.insert("id".to_owned(), json!(42));
    let body = builder_for(&server)
        .delete(&params, Some("users"))
        .await
        .unwrap();

    m.assert();
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_server_error_surfaces_as_transport_error() {
    let server = MockServer::start();
    let _m = server.mock(|when, then| {
        when.method(Method::POST).path("/api/users");
        then.status(500).body("boom");
    });

    let err = builder_for(&server)
        .post(&json!({"name": "x"}), Some("users"))
        .await
        .unwrap_err();

    let RestError::Transport(source) = err else {
        panic!("expected transport error");
    };
    let http_err = source.downcast_ref::<HttpTransportError>().unwrap();
    assert!(matches!(
        http_err,
        HttpTransportError::HttpStatus { status, .. } if status.as_u16() == 500
    ));
}

#[tokio::test]
async fn test_ascending_and_descending_sort_reach_server() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(Method::GET)
            .path("/api/users")
            .query_param("$orderby", "Name, Created desc");
        then.status(200).json_body(json!([]));
    });

    let builder = builder_for(&server);
    let query = QueryOptions::new()
        .with_order_by("Name")
        .with_order_by_desc("Created");
    let descriptor = builder.build_get(&RequestParams::new(), Some("users"), Some(&query));
    assert_eq!(descriptor.path, "/api/users?$orderby=Name, Created%20desc");

    let body = builder
        .get(&RequestParams::new(), Some("users"), Some(&query))
        .await
        .unwrap();

    m.assert();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_raw_query_keys_are_escaped_on_the_wire() {
    let server = MockServer::start();
    let m = server.mock(|when, then| {
        when.method(Method::GET)
            .path("/api/users/")
            .query_param("first name", "Ann")
            .query_param("city", "Oslo");
        then.status(200).json_body(json!([{"id": 1}]));
    });

    let mut params = RequestParams::new();
    params.insert("first name".to_owned(), json!("Ann"));
    params.insert("city".to_owned(), json!("Oslo"));
    let body = builder_for(&server)
        .get(&params, Some("users"), None)
        .await
        .unwrap();

    m.assert();
    assert_eq!(body, json!([{"id": 1}]));
}
