//! End-to-end calls: build, execute, parse.

use tracing::{debug, instrument};

use crate::client::ArmisClient;
use crate::config::ClientConfig;
use crate::context::CallContext;
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{CreatedPolicy, ListEntry, PolicyPage, PolicySettings};

/// Armis API client that owns its transport.
///
/// Holds no mutable state, so one instance can serve concurrent callers.
///
/// ```rust,no_run
/// use armis_client::{Armis, CallContext, ClientConfig};
///
/// let armis = Armis::new(ClientConfig::new("https://tenant.armis.com", "api-key"));
/// let lists = armis.get_lists(&CallContext::background())?;
/// # Ok::<(), armis_client::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Armis<T = UreqTransport> {
    client: ArmisClient,
    transport: T,
}

impl Armis<UreqTransport> {
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::new(config.timeout());
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> Armis<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: ArmisClient::new(config),
            transport,
        }
    }

    /// The request builder/parser, for hosts that run their own I/O.
    pub fn client(&self) -> &ArmisClient {
        &self.client
    }

    #[instrument(level = "debug", skip_all)]
    pub fn get_lists(&self, ctx: &CallContext) -> Result<Vec<ListEntry>> {
        let response = self.round_trip(self.client.build_get_lists(), ctx)?;
        self.client.parse_get_lists(response)
    }

    /// Validates the policy, creates it and returns the generated id.
    #[instrument(level = "debug", skip_all, fields(name = %policy.name))]
    pub fn create_policy(&self, ctx: &CallContext, policy: &PolicySettings) -> Result<CreatedPolicy> {
        let request = self.client.build_create_policy(policy)?;
        let response = self.round_trip(request, ctx)?;
        self.client.parse_create_policy(response)
    }

    #[instrument(level = "debug", skip(self, ctx))]
    pub fn get_policy(&self, ctx: &CallContext, id: &str) -> Result<PolicySettings> {
        let request = self.client.build_get_policy(id)?;
        let response = self.round_trip(request, ctx)?;
        self.client.parse_get_policy(response)
    }

    #[instrument(level = "debug", skip_all)]
    pub fn get_all_policies(&self, ctx: &CallContext) -> Result<Vec<PolicySettings>> {
        let response = self.round_trip(self.client.build_get_all_policies(), ctx)?;
        self.client.parse_get_all_policies(response)
    }

    /// Same request as `get_all_policies`, keeping `count`/`next`/`prev`/`total`.
    #[instrument(level = "debug", skip_all)]
    pub fn get_policies_page(&self, ctx: &CallContext) -> Result<PolicyPage> {
        let response = self.round_trip(self.client.build_get_all_policies(), ctx)?;
        self.client.parse_get_policies_page(response)
    }

    #[instrument(level = "debug", skip(self, ctx, policy))]
    pub fn update_policy(&self, ctx: &CallContext, policy: &PolicySettings, id: &str) -> Result<PolicySettings> {
        let request = self.client.build_update_policy(policy, id)?;
        let response = self.round_trip(request, ctx)?;
        self.client.parse_update_policy(response)
    }

    #[instrument(level = "debug", skip(self, ctx))]
    pub fn delete_policy(&self, ctx: &CallContext, id: &str) -> Result<bool> {
        let request = self.client.build_delete_policy(id)?;
        let response = self.round_trip(request, ctx)?;
        self.client.parse_delete_policy(response)
    }

    fn round_trip(&self, request: HttpRequest, ctx: &CallContext) -> Result<HttpResponse> {
        debug!(method = request.method.as_str(), url = %request.path, "sending request");
        let response = self.transport.execute(&request, ctx)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}
