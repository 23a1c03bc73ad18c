#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Client-side SDK on top of the query, request and pagination crates.
//!
//! A [`Service`] binds a [`soa_rest::RequestBuilder`] to one resource and adds
//! create-or-update semantics, a fluent [`ServiceQuery`] and optional
//! pagination of list responses. [`Store`] is the key/value contract used for
//! client-side state such as tokens or user preferences.

mod service;
mod store;

pub use service::{OnGet, Service, ServiceQuery, ServiceResponse};
pub use store::{MemoryStore, Store, StoreError, StoreExt};

pub use soa_odata as odata;
pub use soa_pagination as pagination;
pub use soa_rest as rest;
