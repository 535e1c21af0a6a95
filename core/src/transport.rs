//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! `Transport` is the only seam where I/O happens, so tests can swap in a
//! recording implementation. `UreqTransport` is the blocking default. The
//! ureq round-trip runs on a worker thread while the calling thread watches
//! the context, so a cancelled token or a passed deadline returns control to
//! the caller immediately even if the server never answers. An abandoned
//! worker is bounded by ureq's global timeout and its result is dropped.

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use tracing::debug;

use crate::context::CallContext;
use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// How often a waiting caller re-checks its context.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Performs one HTTP round-trip.
///
/// Implementations return non-2xx responses as data; status interpretation
/// belongs to `ArmisClient::parse_*`.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest, ctx: &CallContext) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest, ctx: &CallContext) -> Result<HttpResponse> {
        (**self).execute(request, ctx)
    }
}

/// Blocking transport backed by one shared ureq agent.
///
/// Cloning is cheap and clones share the agent's connection pool.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    timeout: Option<Duration>,
}

impl UreqTransport {
    /// `timeout` bounds every request; a shorter context deadline wins.
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent, timeout }
    }

    fn effective_timeout(&self, ctx: &CallContext) -> Option<Duration> {
        match (self.timeout, ctx.remaining()) {
            (Some(configured), Some(remaining)) => Some(configured.min(remaining)),
            (configured, remaining) => configured.or(remaining),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest, ctx: &CallContext) -> Result<HttpResponse> {
        ctx.check()?;

        let (tx, rx) = mpsc::sync_channel(1);
        let agent = self.agent.clone();
        let outgoing = request.clone();
        let timeout = self.effective_timeout(ctx);
        thread::Builder::new()
            .name("armis-http".to_string())
            .spawn(move || {
                // Fails only when the caller has stopped waiting.
                let _ = tx.send(round_trip(&agent, &outgoing, timeout));
            })
            .map_err(|err| Error::Transport(err.to_string()))?;

        let url = request.path.as_str();
        loop {
            match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok(response)) => {
                    // The response is discarded if the caller gave up while it was in flight.
                    if ctx.token().is_cancelled() {
                        debug!(url, "request cancelled while in flight");
                        return Err(Error::Cancelled);
                    }
                    return Ok(response);
                }
                Ok(Err(err)) => return Err(transport_error(err, ctx)),
                Err(RecvTimeoutError::Timeout) => {
                    if let Err(err) = ctx.check() {
                        debug!(url, %err, "abandoning in-flight request");
                        return Err(err);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(Error::Transport("request worker exited without a result".to_string()));
                }
            }
        }
    }
}

fn round_trip(
    agent: &ureq::Agent,
    request: &HttpRequest,
    timeout: Option<Duration>,
) -> std::result::Result<HttpResponse, ureq::Error> {
    let url = request.path.as_str();
    let headers = request.headers.as_slice();
    let body = request.body.as_deref().unwrap_or_default().as_bytes();

    let mut response = match request.method {
        HttpMethod::Get => {
            let builder = agent.get(url).config().timeout_global(timeout).build();
            with_headers(builder, headers).call()?
        }
        HttpMethod::Delete => {
            let builder = agent.delete(url).config().timeout_global(timeout).build();
            with_headers(builder, headers).call()?
        }
        HttpMethod::Post => {
            let builder = agent.post(url).config().timeout_global(timeout).build();
            with_headers(builder, headers).send(body)?
        }
        HttpMethod::Patch => {
            let builder = agent.patch(url).config().timeout_global(timeout).build();
            with_headers(builder, headers).send(body)?
        }
    };

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let body = response.body_mut().read_to_string()?;

    Ok(HttpResponse {
        status,
        headers,
        body,
    })
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn transport_error(err: ureq::Error, ctx: &CallContext) -> Error {
    if ctx.token().is_cancelled() {
        return Error::Cancelled;
    }
    if matches!(err, ureq::Error::Timeout(_)) && ctx.is_expired() {
        return Error::DeadlineExceeded;
    }
    Error::Transport(err.to_string())
}
