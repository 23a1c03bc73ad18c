#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! REST request building for `OData`-style backends.
//!
//! [`RequestBuilder`] turns a resource name, request parameters and optional
//! [`soa_odata::QueryOptions`] into a [`RequestDescriptor`], runs it through an
//! [`OnSend`] hook and hands it to a [`Transport`]:
//!
//! - `get`/`delete` place a single parameter as a path segment and several as a query string
//! - `post`/`put` carry parameters as the JSON body
//! - `delete` with an `ids` entry is sent as a POST of those ids
//!
//! Every call is a single attempt; retries and timeouts belong to the transport.

mod builder;
mod config;
mod descriptor;
mod error;
mod hook;
mod transport;

pub use builder::{RequestBuilder, RequestParams};
pub use config::RestConfig;
pub use descriptor::{HttpMethod, RequestDescriptor};
pub use error::{BoxError, HttpTransportError, RestError};
pub use hook::{OnSend, PassThrough};
pub use transport::{HttpTransport, Transport};
