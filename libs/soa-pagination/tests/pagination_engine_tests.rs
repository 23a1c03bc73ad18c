#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use soa_odata::{Paginate, QueryOptions};
use soa_pagination::{PaginationConfig, PaginationEngine, ResultEnvelope};

fn counted(count: i64, data: Value) -> ResultEnvelope {
    ResultEnvelope::Counted { count, data }
}

#[test]
fn test_first_of_three_pages() {
    let engine = PaginationEngine::default();
    let params = Paginate::new(1, 10).with_base_url("/users");

    let result = engine.get(&params, counted(25, json!([1, 2, 3])));
    let p = result.pagination;

    assert_eq!(p.page_count, 3);
    assert_eq!(p.begin_record, 1);
    assert_eq!(p.end_record, 10);
    assert_eq!(p.prev_class, "hide");
    assert_eq!(p.next_class, "");
    assert_eq!(p.prev_page, "/users/1");
    assert_eq!(p.prev_page_no, None);
    assert_eq!(p.next_page, "/users/2");
    assert_eq!(p.next_page_no, Some(2));
    assert_eq!(p.first_page, "/users/1");
    assert_eq!(p.last_page, "/users/3");
    assert_eq!(p.count, 25);
    assert_eq!(result.data, json!([1, 2, 3]));

    let pages: Vec<_> = p.pages.iter().map(|l| l.page).collect();
    assert_eq!(pages, vec![1, 2, 3]);
    assert_eq!(p.pages.iter().filter(|l| l.is_active()).count(), 1);
    assert!(p.pages[0].is_active());
}

#[test]
fn test_empty_result() {
    let engine = PaginationEngine::default();
    let result = engine.get(&Paginate::new(1, 10), counted(0, json!([])));
    let p = result.pagination;

    assert_eq!(p.page_count, 1);
    assert_eq!(p.begin_record, 0);
    assert_eq!(p.end_record, 0);
    assert_eq!(p.prev_class, "hide");
    assert_eq!(p.next_class, "hide");
    assert_eq!(p.next_page, p.last_page);
}

#[test]
fn test_last_page_next_is_last() {
    let engine = PaginationEngine::default();
    let params = Paginate::new(3, 10).with_base_url("/users");
    let p = engine.get(&params, counted(25, json!([]))).pagination;

    assert_eq!(p.begin_record, 21);
    assert_eq!(p.end_record, 25);
    assert_eq!(p.prev_class, "");
    assert_eq!(p.prev_page, "/users/2");
    assert_eq!(p.prev_page_no, Some(2));
    assert_eq!(p.next_class, "hide");
    assert_eq!(p.next_page, "/users/3");
    assert_eq!(p.next_page_no, None);
}

#[test]
fn test_records_envelope_counts_sequence() {
    let engine = PaginationEngine::default();
    let records: Vec<Value> = (1..=12).map(|i| json!({"id": i})).collect();
    let result = engine.get(&Paginate::new(2, 5), ResultEnvelope::Records(records));

    assert_eq!(result.pagination.count, 12);
    assert_eq!(result.pagination.page_count, 3);
    assert_eq!(result.pagination.begin_record, 6);
    assert_eq!(result.pagination.end_record, 10);
    assert_eq!(result.data.as_array().map(Vec::len), Some(12));
}

#[test]
fn test_query_options_are_unwrapped() {
    let engine = PaginationEngine::default();
    let query = QueryOptions::new()
        .with_order_by("Name")
        .with_paginate(Paginate::new(2, 10).with_base_url("/users"));

    let p = engine.get(&query, counted(25, json!([]))).pagination;
    assert_eq!(p.page, 2);
    assert_eq!(p.prev_page, "/users/1");
}

#[test]
fn test_path_links_keep_query_suffix() {
    let engine = PaginationEngine::default();
    let params = Paginate::new(2, 10)
        .with_base_url("/users")
        .with_raw_url("/users/2?$orderBy=Name");

    let p = engine.get(&params, counted(30, json!([]))).pagination;
    assert_eq!(p.next_page, "/users/3?$orderBy=Name");
    assert_eq!(p.pages[1].page_url, "/users/2?$orderBy=Name");
}

#[test]
fn test_query_string_links() {
    let engine = PaginationEngine::new(PaginationConfig {
        page_query_string: true,
        ..PaginationConfig::default()
    });

    let params = Paginate::new(2, 10)
        .with_base_url("/users")
        .with_raw_url("/users?page=2&sort=Name");
    let p = engine.get(&params, counted(30, json!([]))).pagination;
    assert_eq!(p.prev_page, "/users?page=1&sort=Name");
    assert_eq!(p.next_page, "/users?page=3&sort=Name");

    let params = Paginate::new(1, 10).with_base_url("/users");
    let p = engine.get(&params, counted(30, json!([]))).pagination;
    assert_eq!(p.next_page, "/users?page=2");

    let params = Paginate::new(1, 10)
        .with_base_url("/users")
        .with_raw_url("/users?sort=Name");
    let p = engine.get(&params, counted(30, json!([]))).pagination;
    assert_eq!(p.last_page, "/users?sort=Name&page=3");
}

#[test]
fn test_centered_window_marks_current_page() {
    let engine = PaginationEngine::default();
    let params = Paginate::new(15, 10).with_base_url("/users");
    let p = engine.get(&params, counted(500, json!([]))).pagination;

    let pages: Vec<_> = p.pages.iter().map(|l| l.page).collect();
    assert_eq!(pages, (11..=20).collect::<Vec<_>>());
    let active: Vec<_> = p.pages.iter().filter(|l| l.is_active()).map(|l| l.page).collect();
    assert_eq!(active, vec![15]);
}

#[test]
fn test_degenerate_inputs_do_not_panic() {
    let engine = PaginationEngine::default();

    let p = engine
        .get(&Paginate::default(), counted(25, json!([])))
        .pagination;
    assert_eq!(p.page, 1);
    assert_eq!(p.page_count, 1);

    let p = engine.get(&Paginate::new(99, 10), counted(25, json!([]))).pagination;
    assert_eq!(p.page_count, 3);
    assert_eq!(p.end_record, 25);
    assert!(p.pages.iter().all(|l| !l.is_active()));

    let p = engine.get(&Paginate::new(-3, 10), counted(25, json!([]))).pagination;
    assert_eq!(p.prev_class, "hide");
}

#[test]
fn test_from_json_and_wire_shape() {
    let config = PaginationConfig::default();
    let engine = PaginationEngine::new(config.clone());
    let envelope = ResultEnvelope::from_json(json!({"count": 25, "data": [{"id": 1}]}), &config);
    let params: Paginate = serde_json::from_value(json!({
        "page": "1",
        "pageSize": 10,
        "baseUrl": "/users"
    }))
    .unwrap();

    let result = engine.get(&params, envelope);
    let wire = serde_json::to_value(&result).unwrap();

    assert_eq!(wire["pagination"]["pageCount"], 3);
    assert_eq!(wire["pagination"]["prevClass"], "hide");
    assert_eq!(wire["pagination"]["pages"][0]["activePage"], "active");
    assert_eq!(wire["pagination"]["pages"][1].get("activePage"), None);
    assert_eq!(wire["data"], json!([{"id": 1}]));
}

#[test]
fn test_get_is_idempotent() {
    let engine = PaginationEngine::default();
    let params = Paginate::new(4, 7).with_base_url("/x").with_raw_url("/x/4?q=1");
    let a = engine.get(&params, counted(100, json!([1])));
    let b = engine.get(&params, counted(100, json!([1])));
    assert_eq!(a, b);
}
