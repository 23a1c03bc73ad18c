#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `OData` v4 query translation for loosely-typed query intents.
//!
//! This crate turns the query surface a frontend hands over (prefixed filter
//! keys, sort fields, page/skip/top values) into the wire query string of an
//! `OData` v4 backend:
//!
//! - [`FilterTranslator`] renders a [`QueryIntent`] into a single `$filter` expression
//! - [`QueryComposer`] appends `$filter`, `$orderby`, `$skip`, `$top` and `$count`
//!   fragments to a URL under construction
//! - [`compose`] drives any [`QueryProvider`] in the one order the fragments may be emitted
//! - [`sort`] builds and reads frontend sort links (`$orderBy` / `$orderByDesc`)
//!
//! # Example
//!
//! ```
//! use soa_odata::{compose, Paginate, QueryComposer, QueryIntent, QueryOptions};
//!
//! let intent = QueryIntent::new().with("cl_Name", "bob");
//! let options = QueryOptions::new()
//!     .with_filter(intent)
//!     .with_order_by("Name")
//!     .with_paginate(Paginate::new(2, 10));
//!
//! let mut path = String::from("/api/users");
//! compose(&QueryComposer::default(), &mut path, &options);
//!
//! assert_eq!(
//!     path,
//!     "/api/users?$filter=contains%28tolower%28Name%29%2Ctolower%28%27bob%27%29%29\
//!      &$orderby=Name&$skip=10&$top=10&$count=true"
//! );
//! ```

pub mod compose;
pub mod filter;
pub mod intent;
pub mod sort;
pub mod url;

pub use compose::{Filter, Paginate, QueryComposer, QueryOptions, QueryProvider, compose};
pub use filter::{CaseFold, FilterOp, FilterTranslator};
pub use intent::QueryIntent;
pub use sort::{SortDir, SortState};
