//! Dispatch Operation use case.
//!
//! Routes one [`OperationRequest`] to its remote call, resolves the target
//! session through the [`ConnectionRegistry`], and normalizes the outcome into
//! a [`ResponseEnvelope`] addressed to a [`ResponseChannel`].
//!
//! Contract:
//! 1. Exactly one [`DispatchResponse`] per request. Failures never escape as
//!    `Err`; they become failure envelopes.
//! 2. Exactly one [`LogEntry`] per request, on channel `Info` for a success
//!    and `Error` for a failure, addressed to the requesting sender.
//! 3. Every remote call is bounded by [`DispatchPolicy::request_timeout`].

use crate::config::DispatchPolicy;
use crate::ports::crm_gateway::{CrmGateway, CrmSession, GatewayError};
use crate::ports::log_relay::{LogRelay, NoLogRelay};
use crate::registry::{ConnectionRegistry, SessionNotFound};
use eforce_domain::{
    Credentials, DomainError, ErrorDetail, LimitInfo, LogChannel, LogEntry, ORGANIZATION_SOBJECT,
    OperationKind, OperationRequest, OrgId, RecordSet, ResponseChannel, ResponseEnvelope,
    SObjectName, SenderId, SoqlQuery, SoslSearch, organization_query,
};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why an operation failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("{0}")]
    AuthenticationFailure(GatewayError),

    #[error("No active session for organization {0}")]
    SessionNotFound(OrgId),

    #[error("{0}")]
    RemoteCallFailure(GatewayError),

    #[error("{0}")]
    ValidationFailure(String),
}

impl DispatchError {
    /// Error detail placed in the payload slot of the failure envelope.
    pub fn detail(&self) -> ErrorDetail {
        match self {
            DispatchError::AuthenticationFailure(e) | DispatchError::RemoteCallFailure(e) => {
                ErrorDetail::new(e.error_code(), e.detail_message())
            }
            DispatchError::SessionNotFound(_) => {
                ErrorDetail::new("SESSION_NOT_FOUND", self.to_string())
            }
            DispatchError::ValidationFailure(message) => {
                ErrorDetail::new("INVALID_REQUEST", message.clone())
            }
        }
    }
}

impl From<SessionNotFound> for DispatchError {
    fn from(err: SessionNotFound) -> Self {
        DispatchError::SessionNotFound(err.0)
    }
}

impl From<DomainError> for DispatchError {
    fn from(err: DomainError) -> Self {
        DispatchError::ValidationFailure(err.to_string())
    }
}

/// One envelope plus the outbound channel it belongs on.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResponse {
    pub channel: ResponseChannel,
    pub envelope: ResponseEnvelope,
}

struct Completed {
    message: String,
    payload: Value,
    log: String,
    limit_info: Option<LimitInfo>,
}

struct Failed {
    message: String,
    error: DispatchError,
    limit_info: Option<LimitInfo>,
}

impl Failed {
    fn new(message: impl Into<String>, error: DispatchError) -> Self {
        Self {
            message: message.into(),
            error,
            limit_info: None,
        }
    }

    fn with_limit_info(mut self, limit_info: Option<LimitInfo>) -> Self {
        self.limit_info = limit_info;
        self
    }
}

type Outcome = Result<Completed, Failed>;

/// Encode a result for the payload slot. A value that cannot be encoded fails
/// the operation rather than answering success with an empty payload.
fn payload<T: Serialize>(kind: OperationKind, value: &T) -> Result<Value, Failed> {
    serde_json::to_value(value).map_err(|e| {
        Failed::new(
            kind.failure_message(),
            DispatchError::RemoteCallFailure(GatewayError::UnexpectedResponse(format!(
                "cannot encode {} payload: {}",
                kind, e
            ))),
        )
    })
}

/// Use case that executes operation requests against registered sessions.
///
/// Cheap to clone; clones share the gateway, registry and relay, so one
/// instance can serve many concurrent requests.
#[derive(Clone)]
pub struct DispatchOperationUseCase {
    gateway: Arc<dyn CrmGateway>,
    registry: Arc<ConnectionRegistry>,
    log_relay: Arc<dyn LogRelay>,
    policy: DispatchPolicy,
}

impl DispatchOperationUseCase {
    pub fn new(gateway: Arc<dyn CrmGateway>, registry: Arc<ConnectionRegistry>) -> Self {
        Self {
            gateway,
            registry,
            log_relay: Arc::new(NoLogRelay),
            policy: DispatchPolicy::default(),
        }
    }

    /// Create with a log relay.
    pub fn with_log_relay(mut self, relay: Arc<dyn LogRelay>) -> Self {
        self.log_relay = relay;
        self
    }

    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn policy(&self) -> &DispatchPolicy {
        &self.policy
    }

    /// Execute one request and produce its envelope.
    pub async fn execute(&self, sender: &SenderId, request: OperationRequest) -> DispatchResponse {
        let kind = request.kind();
        debug!("Dispatching {} for {}", kind, sender);

        let outcome = match request {
            OperationRequest::Login(credentials) => self.login(credentials).await,
            OperationRequest::Logout { org } => self.logout(&org).await,
            OperationRequest::Query { org, soql } => self.query(&org, &soql).await,
            OperationRequest::Search { org, sosl } => self.search(&org, &sosl).await,
            OperationRequest::Describe { org, sobject } => self.describe(&org, &sobject).await,
            OperationRequest::OrgExplore { org } => self.org_explore(&org).await,
        };

        self.conclude(sender, kind, outcome)
    }

    /// Produce the failure response for a request that could not be built.
    ///
    /// `kind` is the operation the caller named, if it was recognized; it
    /// picks the channel and message. Unrecognized requests go to the generic
    /// channel.
    pub fn reject(
        &self,
        sender: &SenderId,
        kind: Option<OperationKind>,
        error: DispatchError,
    ) -> DispatchResponse {
        match kind {
            Some(kind) => {
                let failed = Failed::new(kind.failure_message(), error);
                self.conclude(sender, kind, Err(failed))
            }
            None => {
                let failed = Failed::new("Request Failed", error);
                self.fail(sender, ResponseChannel::Generic, failed)
            }
        }
    }

    /// Forward a surface-originated log message straight to the relay.
    pub fn relay_log(&self, sender: &SenderId, channel: LogChannel, message: impl Into<String>) {
        self.log_relay
            .relay(LogEntry::new(sender.clone(), channel, message));
    }

    // ==================== Outcome Normalization ====================

    fn conclude(&self, sender: &SenderId, kind: OperationKind, outcome: Outcome) -> DispatchResponse {
        match outcome {
            Ok(completed) => {
                debug!("{} succeeded: {}", kind, completed.log);
                self.log_relay
                    .relay(LogEntry::info(sender.clone(), completed.log));
                DispatchResponse {
                    channel: kind.success_channel(),
                    envelope: ResponseEnvelope::success(completed.message, completed.payload)
                        .with_limit_info(completed.limit_info),
                }
            }
            Err(failed) => self.fail(sender, kind.failure_channel(), failed),
        }
    }

    fn fail(&self, sender: &SenderId, channel: ResponseChannel, failed: Failed) -> DispatchResponse {
        debug!("{}: {}", failed.message, failed.error);
        self.log_relay.relay(LogEntry::error(
            sender.clone(),
            format!("{} {}", failed.message, failed.error),
        ));
        DispatchResponse {
            channel,
            envelope: ResponseEnvelope::failure(failed.message, failed.error.detail())
                .with_limit_info(failed.limit_info),
        }
    }

    // ==================== Remote Calls ====================

    async fn call<T>(&self, fut: impl Future<Output = Result<T, GatewayError>>) -> Result<T, GatewayError> {
        match self.policy.request_timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .unwrap_or(Err(GatewayError::Timeout)),
            None => fut.await,
        }
    }

    async fn resolve(&self, kind: OperationKind, org: &OrgId) -> Result<Arc<dyn CrmSession>, Failed> {
        self.registry
            .get(org)
            .await
            .map_err(|e| Failed::new(kind.failure_message(), e.into()))
    }

    async fn login(&self, credentials: Credentials) -> Outcome {
        let message = OperationKind::Login.failure_message();
        debug!(
            "Logging in as {} via {}",
            credentials.username(),
            credentials.login_url()
        );

        let connection = self
            .call(self.gateway.login(&credentials))
            .await
            .map_err(|e| Failed::new(message, DispatchError::AuthenticationFailure(e)))?;

        let session = connection.session();
        let org_id = session.org_id().clone();
        let user_info = session.user_info();
        let log = format!(
            "New connection to {} for org {} as user {}",
            session.instance_url(),
            org_id,
            session.user_id()
        );

        if self
            .registry
            .put(org_id.clone(), Arc::clone(&connection))
            .await
            .is_some()
        {
            debug!("Replaced previous session for {}", org_id);
        }

        Ok(Completed {
            message: "Login Successful".to_string(),
            payload: payload(OperationKind::Login, &user_info)?,
            log,
            limit_info: None,
        })
    }

    async fn logout(&self, org: &OrgId) -> Outcome {
        let kind = OperationKind::Logout;
        let connection = self.resolve(kind, org).await?;

        if let Err(e) = self.call(connection.logout()).await {
            return Err(
                Failed::new(kind.failure_message(), DispatchError::RemoteCallFailure(e))
                    .with_limit_info(connection.limit_info()),
            );
        }

        let log = if self.policy.evict_on_logout {
            if self.registry.remove_if_same(org, &connection).await {
                format!("Logged out of org {}; session removed", org)
            } else {
                info!("Org {} logged in again during logout; keeping the new session", org);
                format!("Logged out of org {}; newer session retained", org)
            }
        } else {
            format!("Logged out of org {}; session retained", org)
        };

        Ok(Completed {
            message: "Logout Successful".to_string(),
            payload: Value::Object(Default::default()),
            log,
            limit_info: connection.limit_info(),
        })
    }

    async fn query(&self, org: &OrgId, soql: &SoqlQuery) -> Outcome {
        let kind = OperationKind::Query;
        let connection = self.resolve(kind, org).await?;
        debug!("Query on {}: {}", org, soql);

        let result = self.call(connection.query(soql)).await.map_err(|e| {
            Failed::new(kind.failure_message(), DispatchError::RemoteCallFailure(e))
                .with_limit_info(connection.limit_info())
        })?;

        let records = RecordSet::from(result);
        Ok(Completed {
            message: "Query Successful".to_string(),
            log: format!(
                "Query returned {} of {} records from org {}",
                records.len(),
                records.total_size,
                org
            ),
            payload: payload(kind, &records)
                .map_err(|f| f.with_limit_info(connection.limit_info()))?,
            limit_info: connection.limit_info(),
        })
    }

    async fn search(&self, org: &OrgId, sosl: &SoslSearch) -> Outcome {
        let kind = OperationKind::Search;
        let connection = self.resolve(kind, org).await?;
        debug!("Search on {}: {}", org, sosl);

        let result = self.call(connection.search(sosl)).await.map_err(|e| {
            Failed::new(kind.failure_message(), DispatchError::RemoteCallFailure(e))
                .with_limit_info(connection.limit_info())
        })?;

        let records = RecordSet::from(result);
        Ok(Completed {
            message: "Search Successful".to_string(),
            log: format!(
                "Search returned {} records from org {}",
                records.len(),
                org
            ),
            payload: payload(kind, &records)
                .map_err(|f| f.with_limit_info(connection.limit_info()))?,
            limit_info: connection.limit_info(),
        })
    }

    async fn describe(&self, org: &OrgId, sobject: &SObjectName) -> Outcome {
        let kind = OperationKind::Describe;
        let connection = self.resolve(kind, org).await?;

        let result = self.call(connection.describe(sobject)).await.map_err(|e| {
            Failed::new(kind.failure_message(), DispatchError::RemoteCallFailure(e))
                .with_limit_info(connection.limit_info())
        })?;

        Ok(Completed {
            message: format!("Describe {} Successful", sobject),
            log: format!(
                "Described {} ({} fields) in org {}",
                sobject,
                result.fields.len(),
                org
            ),
            payload: payload(kind, &result)
                .map_err(|f| f.with_limit_info(connection.limit_info()))?,
            limit_info: connection.limit_info(),
        })
    }

    /// Describe `Organization`, select every reported field, and return the
    /// first record.
    async fn org_explore(&self, org: &OrgId) -> Outcome {
        let kind = OperationKind::OrgExplore;
        let connection = self.resolve(kind, org).await?;

        let organization = SObjectName::new(ORGANIZATION_SOBJECT)
            .map_err(|e| Failed::new(kind.failure_message(), e.into()))?;
        let describe = self
            .call(connection.describe(&organization))
            .await
            .map_err(|e| {
                Failed::new(
                    "Describe Org in fetch process failed",
                    DispatchError::RemoteCallFailure(e),
                )
                .with_limit_info(connection.limit_info())
            })?;

        if describe.fields.is_empty() {
            warn!(
                "Organization describe for {} returned no fields; the synthesized query will be rejected remotely",
                org
            );
        }
        let soql = SoqlQuery::new(organization_query(&describe))
            .map_err(|e| Failed::new(kind.failure_message(), e.into()))?;
        debug!("Org explore query on {}: {}", org, soql);

        let result = self.call(connection.query(&soql)).await.map_err(|e| {
            Failed::new(kind.failure_message(), DispatchError::RemoteCallFailure(e))
                .with_limit_info(connection.limit_info())
        })?;

        let record = result.records.into_iter().next().ok_or_else(|| {
            Failed::new(
                kind.failure_message(),
                DispatchError::RemoteCallFailure(GatewayError::UnexpectedResponse(
                    "query returned no Organization record".to_string(),
                )),
            )
            .with_limit_info(connection.limit_info())
        })?;

        Ok(Completed {
            message: "Fetched Org Details".to_string(),
            log: format!(
                "Fetched organization details for org {} ({} fields)",
                org,
                describe.fields.len()
            ),
            payload: record,
            limit_info: connection.limit_info(),
        })
    }
}
