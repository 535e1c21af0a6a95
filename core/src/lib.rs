//! Typed client for the Armis policies and lists REST API.
//!
//! # Overview
//! `ArmisClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network. `Armis` pairs it with a `Transport` (the
//! blocking `UreqTransport` by default) to run whole calls end to end.
//!
//! # Design
//! - Configuration is an immutable `ClientConfig` handed to the constructor.
//! - Every `build_*` method validates its input first, so an invalid policy
//!   or id never becomes a request.
//! - Every response is wrapped in the `{success, data, error}` envelope;
//!   `parse_*` methods unwrap it or return a typed `Error`.
//! - Calls take a `CallContext` that carries the deadline and cancellation
//!   token for that call.

pub mod armis;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;
pub mod validate;

pub use armis::Armis;
pub use client::ArmisClient;
pub use config::ClientConfig;
pub use context::{CallContext, CancellationToken};
pub use error::{Error, Result, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
pub use types::{CreatedPolicy, Envelope, ListEntry, PolicyPage, PolicySettings, RuleType, Rules};
pub use validate::{validate_policy_id, MAX_DESCRIPTION_LENGTH};
