//! WooCommerce / WordPress REST plumbing.
//!
//! Every tool handler talks to the store through a [`StoreClient`] built for
//! that single call. The client scopes requests to a site and a credential
//! set, and the response normalizer turns failed HTTP responses into the
//! uniform [`ApiError`] the dispatcher knows how to report.
//!
//! - `client.rs` - client factory (WooCommerce keys or WordPress basic auth)
//! - `query.rs` - ordered query-string builder
//! - `response.rs` - response normalizer
//! - `error.rs` - the domain error type

mod client;
mod error;
mod query;
mod response;

pub use client::{ApiFlavor, StoreClient};
pub use error::{ApiError, ApiResult};
pub use query::Query;
pub use response::normalize_response;
