#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Pagination arithmetic for UI page navigation.
//!
//! Given the page request of a listing and its result envelope, the
//! [`PaginationEngine`] computes page count, record range, a bounded window of
//! page links and prev/next/first/last links. Links are built either as path
//! segments (`/users/3`) or as a `page=` query parameter (`/users?page=3`).

mod config;
mod engine;
mod envelope;
mod links;
mod model;

pub use config::PaginationConfig;
pub use engine::{PageSource, PaginationEngine};
pub use envelope::ResultEnvelope;
pub use links::{LinkStyle, PageLinker};
pub use model::{ACTIVE_PAGE, HIDE_CLASS, PageLink, PaginatedResult, PaginationModel};
