//! Stateless HTTP request builder and response parser for the Armis API.
//!
//! # Design
//! `ArmisClient` holds only its `ClientConfig`. Each operation is split into
//! a `build_*` method that validates input and produces an `HttpRequest`,
//! and a `parse_*` method that unwraps the response envelope. The round-trip
//! in between belongs to a `Transport` or to the host.

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreatedPolicy, Envelope, ListCollection, ListEntry, PolicyPage, PolicySettings};
use crate::validate::validate_policy_id;

const LISTS_PATH: &str = "/api/v1/lists/";
const POLICIES_PATH: &str = "/api/v1/policies/";

/// Synchronous, stateless client for the Armis API.
#[derive(Debug, Clone)]
pub struct ArmisClient {
    config: ClientConfig,
}

impl ArmisClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn build_get_lists(&self) -> HttpRequest {
        self.request(HttpMethod::Get, LISTS_PATH.to_string(), None)
    }

    pub fn build_get_all_policies(&self) -> HttpRequest {
        self.request(HttpMethod::Get, POLICIES_PATH.to_string(), None)
    }

    /// Fails with a validation error if the policy would be rejected.
    pub fn build_create_policy(&self, policy: &PolicySettings) -> Result<HttpRequest> {
        policy.validate()?;
        let body = encode(policy)?;
        Ok(self.request(HttpMethod::Post, POLICIES_PATH.to_string(), Some(body)))
    }

    pub fn build_get_policy(&self, id: &str) -> Result<HttpRequest> {
        validate_policy_id(id)?;
        Ok(self.request(HttpMethod::Get, policy_path(id), None))
    }

    /// The id is checked first, then the policy itself.
    pub fn build_update_policy(&self, policy: &PolicySettings, id: &str) -> Result<HttpRequest> {
        validate_policy_id(id)?;
        policy.validate()?;
        let body = encode(policy)?;
        Ok(self.request(HttpMethod::Patch, policy_path(id), Some(body)))
    }

    pub fn build_delete_policy(&self, id: &str) -> Result<HttpRequest> {
        validate_policy_id(id)?;
        Ok(self.request(HttpMethod::Delete, policy_path(id), None))
    }

    /// An empty collection parses to an empty vec.
    pub fn parse_get_lists(&self, response: HttpResponse) -> Result<Vec<ListEntry>> {
        let collection: ListCollection = parse_data(&response)?;
        Ok(collection.lists)
    }

    pub fn parse_get_policies_page(&self, response: HttpResponse) -> Result<PolicyPage> {
        parse_data(&response)
    }

    /// Policies in the order the API returned them.
    pub fn parse_get_all_policies(&self, response: HttpResponse) -> Result<Vec<PolicySettings>> {
        Ok(self.parse_get_policies_page(response)?.policies)
    }

    pub fn parse_create_policy(&self, response: HttpResponse) -> Result<CreatedPolicy> {
        parse_data(&response)
    }

    pub fn parse_get_policy(&self, response: HttpResponse) -> Result<PolicySettings> {
        parse_data(&response)
    }

    /// Only the fields echoed back by the API are populated.
    pub fn parse_update_policy(&self, response: HttpResponse) -> Result<PolicySettings> {
        parse_data(&response)
    }

    /// Returns the envelope's `success` flag.
    pub fn parse_delete_policy(&self, response: HttpResponse) -> Result<bool> {
        let envelope: Envelope<serde_json::Value> = parse_envelope(&response)?;
        Ok(envelope.success)
    }

    fn request(&self, method: HttpMethod, path: String, body: Option<String>) -> HttpRequest {
        let mut headers = vec![
            ("authorization".to_string(), self.config.api_key().to_string()),
            ("accept".to_string(), "application/json".to_string()),
        ];
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        HttpRequest {
            method,
            path: format!("{}{path}", self.config.base_url()),
            headers,
            body,
        }
    }
}

fn policy_path(id: &str) -> String {
    format!("{POLICIES_PATH}{}/", urlencoding::encode(id))
}

fn encode(policy: &PolicySettings) -> Result<String> {
    serde_json::to_string(policy).map_err(|e| Error::Serialization(e.to_string()))
}

/// Unwrap the envelope and require `data`.
fn parse_data<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    parse_envelope::<T>(response)?
        .data
        .ok_or_else(|| Error::Decode("response envelope has no data".to_string()))
}

/// Map non-2xx statuses and `success: false` to `Error::Api`, then decode.
fn parse_envelope<T: DeserializeOwned>(response: &HttpResponse) -> Result<Envelope<T>> {
    if !response.is_success() {
        let message = error_message(&response.body);
        warn!(status = response.status, %message, "Armis API returned an error status");
        return Err(Error::Api {
            status: response.status,
            message,
        });
    }

    let envelope: Envelope<T> =
        serde_json::from_str(&response.body).map_err(|e| Error::Decode(e.to_string()))?;

    if !envelope.success {
        let message = envelope
            .error
            .unwrap_or_else(|| "request was not successful".to_string());
        warn!(status = response.status, %message, "Armis API reported failure");
        return Err(Error::Api {
            status: response.status,
            message,
        });
    }
    Ok(envelope)
}

/// The envelope's `error` field if the body is an envelope, otherwise the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Envelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .unwrap_or_else(|| body.to_string())
}
