//! # wikijs-graphql
//!
//! GraphQL transport for the Wiki.js API.
//!
//! One request type: `POST {query, variables}` with a bearer token and an
//! `x-request-id` correlation header. Every failure is returned as a classified
//! [`WikiError`](wikijs_core::WikiError).
//!
//! ## Retry behavior
//!
//! | Condition | Retried |
//! |-----------|---------|
//! | `Transient` errors (5xx, connection failure, timeout) | yes |
//! | HTTP 408, 502, 503, 504 | yes |
//! | HTTP 429 | no |
//! | Documents starting with `mutation` | never |
//! | `RequestOptions::no_retry` | never |
//!
//! Delays follow `min(base * 2^attempt * jitter, cap)` with the defaults in
//! [`RetryPolicy`].

pub mod client;
pub mod retry;
pub mod transport;

pub use client::{GraphqlClient, REQUEST_ID_HEADER, new_request_id};
pub use retry::{RetryDecision, RetryPolicy};
pub use transport::{GraphqlTransport, RequestOptions, decode_data, execute, is_mutation};
