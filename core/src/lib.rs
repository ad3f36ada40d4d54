//! Typed client for the property-management vendor API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). `BlockingClient` pairs the
//! stateless `PmsClient` with a [`Transport`] for callers that just want to
//! make the call.
//!
//! # Design
//! - Status codes are classified by constant rule tables in [`status`]:
//!   allowed-set gate, generic rules, then per-operation refinements.
//! - Every failure is a distinct `ApiError` variant; nothing is retried.
//! - Responses stay as `serde_json::Value` so they can be checked against a
//!   JSON Schema; outgoing rate batches are typed.

pub mod blocking;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod routes;
pub mod status;
pub mod transport;
pub mod types;

pub use blocking::BlockingClient;
pub use client::PmsClient;
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use routes::Route;
pub use status::Operation;
pub use transport::{Transport, UreqTransport};
pub use types::{RateEntry, Weekday};
